//! Configuration entry model

use serde::{Deserialize, Serialize};

/// A persisted tunable read by the alert engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub last_modified: String,
}

/// Input for upserting a configuration value
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigInput {
    pub value: String,
    pub description: Option<String>,
}
