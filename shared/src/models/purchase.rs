//! Purchase models
//!
//! A purchase is one recorded acquisition event: a product, an optional
//! supplier, a quantity in some unit, the total paid, and the calendar date.
//! Unit price is always derived as `total_price / quantity`, never stored.

use serde::{Deserialize, Serialize};

/// Input for recording a purchase. Product and supplier are referenced by
/// name; dates travel as `YYYY-MM-DD` strings across the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseInput {
    pub product: String,
    pub supplier: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub total_price: f64,
    pub purchase_date: String,
    pub discount_note: Option<String>,
}

/// A purchase as shown in the history view, with names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRecord {
    pub id: i64,
    pub product: String,
    pub supplier: String,
    pub quantity: f64,
    pub unit: String,
    pub total_price: f64,
    pub purchase_date: String,
    pub discount_note: String,
}

/// Result of a purchase insertion.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseCreated {
    pub purchase_id: i64,
}
