//! HTTP handlers for database backups

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::backup::{BackupInfo, BackupRunResult, BackupService, BackupStats};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateBackupQuery {
    pub compress: Option<bool>,
}

#[derive(Deserialize)]
pub struct CleanupQuery {
    pub retention_days: Option<i64>,
}

#[derive(Deserialize)]
pub struct BackupFileQuery {
    pub file: String,
}

#[derive(Deserialize)]
pub struct RestoreRequest {
    pub file: String,
}

#[derive(serde::Serialize)]
pub struct VerifyResponse {
    pub file: String,
    pub valid: bool,
}

#[derive(serde::Serialize)]
pub struct CleanupResponse {
    pub removed_backups: usize,
}

/// List available backups, newest first
pub async fn list_backups(State(state): State<AppState>) -> AppResult<Json<Vec<BackupInfo>>> {
    let service = BackupService::new(state.db, &state.config);
    let backups = service.list_backups()?;
    Ok(Json(backups))
}

/// Create a backup now
pub async fn create_backup(
    State(state): State<AppState>,
    Query(query): Query<CreateBackupQuery>,
) -> AppResult<Json<BackupInfo>> {
    let compress = query.compress.unwrap_or(state.config.backup.compress);
    let service = BackupService::new(state.db, &state.config);
    let info = service.create_backup(compress).await?;
    Ok(Json(info))
}

/// Backup directory statistics
pub async fn get_backup_stats(State(state): State<AppState>) -> AppResult<Json<BackupStats>> {
    let service = BackupService::new(state.db, &state.config);
    let stats = service.stats()?;
    Ok(Json(stats))
}

/// Remove backups past the retention period
pub async fn cleanup_backups(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> AppResult<Json<CleanupResponse>> {
    let service = BackupService::new(state.db, &state.config);
    let removed = service.clean_old_backups(query.retention_days)?;
    Ok(Json(CleanupResponse {
        removed_backups: removed,
    }))
}

/// Restore the store from a backup file
pub async fn restore_backup(
    State(state): State<AppState>,
    Json(request): Json<RestoreRequest>,
) -> AppResult<Json<()>> {
    let service = BackupService::new(state.db, &state.config);
    service.restore_backup(&request.file).await?;
    Ok(Json(()))
}

/// Verify a backup's integrity
pub async fn verify_backup(
    State(state): State<AppState>,
    Query(query): Query<BackupFileQuery>,
) -> AppResult<Json<VerifyResponse>> {
    let service = BackupService::new(state.db, &state.config);
    let valid = service.verify_backup(&query.file).await?;
    Ok(Json(VerifyResponse {
        file: query.file,
        valid,
    }))
}

/// Full automatic run: create a compressed backup, then apply retention
pub async fn run_automatic_backup(
    State(state): State<AppState>,
) -> AppResult<Json<BackupRunResult>> {
    let service = BackupService::new(state.db, &state.config);
    Ok(Json(service.run_automatic().await))
}
