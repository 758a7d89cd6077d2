//! HTTP handlers for purchase recording and history

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{PurchaseCreated, PurchaseInput, PurchaseRecord};
use crate::services::{AnalyticsService, PurchaseService};
use crate::AppState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub format: Option<String>, // "json" or "csv"
}

/// Record a new purchase
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(input): Json<PurchaseInput>,
) -> AppResult<Json<PurchaseCreated>> {
    let service = PurchaseService::new(state.db);
    let created = service.record(input).await?;
    Ok(Json(created))
}

/// Get the most recent purchases. A store failure degrades to an empty
/// list; the UI treats it like an empty history.
pub async fn get_purchase_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PurchaseService::new(state.db);
    let history: Vec<PurchaseRecord> = match service.history(query.limit.unwrap_or(50)).await {
        Ok(history) => history,
        Err(e) => {
            tracing::error!("Purchase history unavailable: {}", e);
            Vec::new()
        }
    };

    if query.format.as_deref() == Some("csv") {
        let csv = AnalyticsService::export_to_csv(&history)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"purchases.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(history).into_response())
    }
}
