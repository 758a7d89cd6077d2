//! Alert models
//!
//! Alerts are ephemeral findings produced by evaluating rules against the
//! current purchase history. They are never persisted; every invocation of
//! the alert engine builds them fresh.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Info,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Info => "info",
        }
    }
}

/// Alert category. Wire names keep the Spanish labels the UI expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertCategory {
    #[serde(rename = "stock")]
    Stock,
    #[serde(rename = "inactividad")]
    Inactivity,
    #[serde(rename = "precio")]
    Price,
    #[serde(rename = "proveedor")]
    Supplier,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Stock => "stock",
            AlertCategory::Inactivity => "inactividad",
            AlertCategory::Price => "precio",
            AlertCategory::Supplier => "proveedor",
        }
    }
}

/// Alert priority (alta > media > baja)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertPriority {
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "baja")]
    Low,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::High => "alta",
            AlertPriority::Medium => "media",
            AlertPriority::Low => "baja",
        }
    }
}

/// A structured finding produced by the alert engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub category: AlertCategory,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub priority: AlertPriority,
}

/// Aggregated statistics over one alert engine run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertStats {
    pub total_alerts: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub most_recent: Vec<Alert>,
}

impl AlertStats {
    /// Tally a freshly generated alert list.
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut stats = AlertStats {
            total_alerts: alerts.len(),
            ..Default::default()
        };
        for priority in ["alta", "media", "baja"] {
            stats.by_priority.insert(priority.to_string(), 0);
        }
        for alert in alerts {
            *stats
                .by_severity
                .entry(alert.severity.as_str().to_string())
                .or_insert(0) += 1;
            *stats
                .by_category
                .entry(alert.category.as_str().to_string())
                .or_insert(0) += 1;
            *stats
                .by_priority
                .entry(alert.priority.as_str().to_string())
                .or_insert(0) += 1;
        }
        stats.most_recent = alerts.iter().take(5).cloned().collect();
        stats
    }
}
