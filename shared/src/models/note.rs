//! Operational note models

use serde::{Deserialize, Serialize};

/// A free-form note, optionally linked to a product, supplier or purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub tags: Vec<String>,
    pub related_product_id: Option<i64>,
    pub related_supplier_id: Option<i64>,
    pub related_purchase_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or updating a note
#[derive(Debug, Clone, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_product_id: Option<i64>,
    pub related_supplier_id: Option<i64>,
    pub related_purchase_id: Option<i64>,
}

fn default_priority() -> String {
    "media".to_string()
}

fn default_status() -> String {
    "active".to_string()
}

/// Optional filters for the note listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteFilter {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}
