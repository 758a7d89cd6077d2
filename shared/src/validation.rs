//! Validation boundary for incoming data
//!
//! All user-facing input passes through these checks before it reaches the
//! store. Limits are sized for a single small establishment.

use chrono::{Datelike, NaiveDate};

use crate::models::PurchaseInput;

/// Maximum plausible quantity for a single purchase.
const MAX_QUANTITY: f64 = 10_000.0;

/// Maximum plausible total price for a single purchase.
const MAX_PRICE: f64 = 10_000.0;

/// Validate a purchase before it is persisted.
pub fn validate_purchase(input: &PurchaseInput) -> Result<(), &'static str> {
    if input.product.trim().is_empty() {
        return Err("Product is required");
    }

    if !input.quantity.is_finite() || input.quantity <= 0.0 {
        return Err("Quantity must be greater than zero");
    }
    if input.quantity > MAX_QUANTITY {
        return Err("Quantity is implausibly large");
    }

    if input.unit.trim().is_empty() {
        return Err("Measurement unit is required");
    }

    if !input.total_price.is_finite() || input.total_price < 0.0 {
        return Err("Price cannot be negative");
    }
    if input.total_price > MAX_PRICE {
        return Err("Price is implausibly high");
    }

    let date = parse_date(&input.purchase_date)?;
    validate_purchase_date(date, chrono::Local::now().date_naive())?;

    if let Some(note) = &input.discount_note {
        if note.len() > 100 {
            return Err("Discount note cannot exceed 100 characters");
        }
    }

    Ok(())
}

/// A purchase date must not be in the future and not older than one year.
pub fn validate_purchase_date(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date > today {
        return Err("Purchase date cannot be in the future");
    }
    let one_year_ago = today
        .with_year(today.year() - 1)
        .unwrap_or(NaiveDate::MIN);
    if date < one_year_ago {
        return Err("Purchase date is too old (more than 1 year)");
    }
    Ok(())
}

/// Validate a product name (2-50 chars, letters/digits/spaces and Spanish accents).
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.len() < 2 {
        return Err("Product name must have at least 2 characters");
    }
    if name.chars().count() > 50 {
        return Err("Product name cannot exceed 50 characters");
    }
    if !name.chars().all(is_name_char) {
        return Err("Product name contains invalid characters");
    }
    Ok(())
}

/// Validate a supplier name (2-100 chars, slightly wider alphabet).
pub fn validate_supplier_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.len() < 2 {
        return Err("Supplier name must have at least 2 characters");
    }
    if name.chars().count() > 100 {
        return Err("Supplier name cannot exceed 100 characters");
    }
    if !name
        .chars()
        .all(|c| is_name_char(c) || matches!(c, '.' | ',' | '&'))
    {
        return Err("Supplier name contains invalid characters");
    }
    Ok(())
}

/// Validate an analysis date range against the configured maximum window.
pub fn validate_analysis_range(
    start: &str,
    end: &str,
    max_days: i64,
) -> Result<(NaiveDate, NaiveDate), &'static str> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    if start > end {
        return Err("Start date cannot be after end date");
    }
    if (end - start).num_days() > max_days {
        return Err("Date range exceeds the maximum analysis window");
    }

    Ok((start, end))
}

/// Validate a configuration key (`snake_case`, max 50 chars).
pub fn validate_config_key(key: &str) -> Result<(), &'static str> {
    let key = key.trim();
    if key.is_empty() {
        return Err("Configuration key is required");
    }
    if key.len() > 50 {
        return Err("Configuration key cannot exceed 50 characters");
    }
    let mut chars = key.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_lowercase() || first == '_') {
        return Err("Configuration key must start with a lowercase letter or underscore");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err("Configuration key must be lowercase snake_case");
    }
    Ok(())
}

/// Validate a configuration value (max 200 chars).
pub fn validate_config_value(value: &str) -> Result<(), &'static str> {
    if value.len() > 200 {
        return Err("Configuration value cannot exceed 200 characters");
    }
    Ok(())
}

/// Strip characters that could break downstream rendering or queries.
pub fn sanitize_text(text: &str, max_length: Option<usize>) -> String {
    let mut cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | ';'))
        .collect();
    if let Some(max) = max_length {
        if cleaned.chars().count() > max {
            cleaned = cleaned.chars().take(max).collect();
        }
    }
    cleaned
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| "Date must use the YYYY-MM-DD format")
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '-' | '_')
        || "áéíóúÁÉÍÓÚñÑ".contains(c)
}
