//! Supplier models

use serde::{Deserialize, Serialize};

/// Label used where a purchase has no supplier on record.
pub const NO_SUPPLIER: &str = "no supplier";

/// A supplier products can be purchased from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
}

/// Input for creating or updating a supplier
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInput {
    pub name: String,
}
