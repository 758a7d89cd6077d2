//! Common numeric and formatting helpers

/// Round to 2 decimal places (money and quantity fields).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 4 decimal places (unit prices).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Unit price of a purchase, guarded against non-positive quantity.
///
/// Quantity is validated as positive at the input boundary, but derived
/// prices must never divide by zero on bad rows.
pub fn unit_price(total_price: f64, quantity: f64) -> f64 {
    if quantity <= 0.0 {
        return 0.0;
    }
    round4(total_price / quantity)
}

/// Division with a fallback for a zero or non-finite divisor.
pub fn safe_divide(dividend: f64, divisor: f64, default: f64) -> f64 {
    if divisor == 0.0 || !divisor.is_finite() {
        return default;
    }
    dividend / divisor
}

/// Timestamp fragment for generated file names (`YYYYMMDD_HHMMSS`).
pub fn file_timestamp(now: chrono::NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.23456), 1.2346);
        assert_eq!(round4(0.00004), 0.0);
    }

    #[test]
    fn test_unit_price_guards_bad_quantity() {
        assert_eq!(unit_price(10.0, 0.0), 0.0);
        assert_eq!(unit_price(10.0, -2.0), 0.0);
        assert_eq!(unit_price(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_safe_divide() {
        assert_eq!(safe_divide(10.0, 0.0, 0.0), 0.0);
        assert_eq!(safe_divide(10.0, 4.0, 0.0), 2.5);
    }
}
