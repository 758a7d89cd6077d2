//! Product catalog models

use serde::{Deserialize, Serialize};

/// Fallback display unit for products without a configured unit list.
pub const DEFAULT_UNIT: &str = "unit";

/// A product tracked by the purchasing ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Ordered list of valid measurement units; the first entry is the
    /// primary unit used for display.
    pub valid_units: Vec<String>,
}

impl Product {
    /// The unit shown in aggregated views.
    pub fn primary_unit(&self) -> &str {
        self.valid_units
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_UNIT)
    }
}

/// Input for creating or updating a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub valid_units: Vec<String>,
}
