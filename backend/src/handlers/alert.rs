//! HTTP handlers for the alert engine

use axum::{extract::State, Json};

use crate::models::{Alert, AlertStats};
use crate::services::AlertService;
use crate::AppState;

/// Evaluate all alert rules against the current purchase history. A store
/// failure yields an empty list, never partial results.
pub async fn generate_alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    let service = AlertService::new(state.db);
    Json(service.generate_alerts().await)
}

/// Statistics over a fresh alert run
pub async fn get_alert_stats(State(state): State<AppState>) -> Json<AlertStats> {
    let service = AlertService::new(state.db);
    Json(service.alert_stats().await)
}
