//! HTTP handlers for purchase analytics
//!
//! These endpoints are the bridge to the analytics engines: malformed input
//! is rejected at this boundary, but a store failure inside an engine never
//! surfaces as an error — the response degrades to the empty sentinel.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::analytics::{
    AnalyticsService, PurchasingSummary, SimilarPurchase, SupplierComparison, TrendPoint,
};
use crate::services::AppConfigService;
use crate::AppState;

#[derive(Deserialize)]
pub struct VolumeQuery {
    pub start: String,
    pub end: String,
    pub product: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct ComparisonQuery {
    pub recent_n: Option<i64>,
}

#[derive(Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
}

#[derive(Deserialize)]
pub struct SimilarQuery {
    pub product: String,
    pub quantity: f64,
    pub margin: Option<f64>,
}

/// Aggregate purchase volumes over a date range
pub async fn get_volume_analysis(
    State(state): State<AppState>,
    Query(query): Query<VolumeQuery>,
) -> AppResult<impl IntoResponse> {
    let config = AppConfigService::new(state.db.clone());
    let max_days = config.get_i64("max_analysis_days", 730).await;

    let (start, end) = shared::validate_analysis_range(&query.start, &query.end, max_days)
        .map_err(|msg| AppError::validation("date_range", msg))?;

    let service = AnalyticsService::new(state.db);
    let stats = service
        .analyze_volumes(start, end, query.product.as_deref())
        .await;

    if query.format.as_deref() == Some("csv") {
        let csv = AnalyticsService::export_to_csv(&stats)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"volume_analysis.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(stats).into_response())
    }
}

/// Compare suppliers for one product
pub async fn compare_suppliers(
    State(state): State<AppState>,
    Path(product): Path<String>,
    Query(query): Query<ComparisonQuery>,
) -> Json<Vec<SupplierComparison>> {
    let service = AnalyticsService::new(state.db);
    let comparison = service
        .compare_suppliers(&product, query.recent_n.unwrap_or(5))
        .await;
    Json(comparison)
}

/// Price trend for one product over a trailing window
pub async fn get_price_trend(
    State(state): State<AppState>,
    Path(product): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Json<Vec<TrendPoint>> {
    let service = AnalyticsService::new(state.db);
    let trend = service
        .price_trend(&product, query.days.unwrap_or(30))
        .await;
    Json(trend)
}

/// Purchases close to a product's running average price
pub async fn find_similar_purchases(
    State(state): State<AppState>,
    Query(query): Query<SimilarQuery>,
) -> Json<Vec<SimilarPurchase>> {
    let service = AnalyticsService::new(state.db);
    let similar = service
        .find_similar_purchases(&query.product, query.quantity, query.margin.unwrap_or(0.10))
        .await;
    Json(similar)
}

/// Overall purchasing summary
pub async fn get_summary(State(state): State<AppState>) -> Json<PurchasingSummary> {
    let service = AnalyticsService::new(state.db);
    Json(service.general_summary().await)
}
