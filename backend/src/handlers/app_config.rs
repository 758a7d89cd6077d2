//! HTTP handlers for dynamic configuration

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::models::{ConfigEntry, ConfigInput};
use crate::services::AppConfigService;
use crate::AppState;

/// List every configuration entry
pub async fn list_config(State(state): State<AppState>) -> AppResult<Json<Vec<ConfigEntry>>> {
    let service = AppConfigService::new(state.db);
    let entries = service.list().await?;
    Ok(Json(entries))
}

/// Get one configuration entry
pub async fn get_config_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<ConfigEntry>> {
    let service = AppConfigService::new(state.db);
    let entry = service.get_entry(&key).await?;
    Ok(Json(entry))
}

/// Upsert a configuration value
pub async fn set_config_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<ConfigInput>,
) -> AppResult<Json<ConfigEntry>> {
    let service = AppConfigService::new(state.db);
    let entry = service
        .set(&key, &input.value, input.description.as_deref())
        .await?;
    Ok(Json(entry))
}
