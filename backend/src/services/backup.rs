//! Database backups
//!
//! Snapshots are taken with SQLite's `VACUUM INTO`, which produces a
//! consistent point-in-time copy without blocking concurrent readers.
//! Backups can be gzip-compressed, are named
//! `stock_backup_YYYYMMDD_HHMMSS.db[.gz]`, and old files are removed after
//! a configurable retention period.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, SqlitePool};

use shared::file_timestamp;

use crate::config::Config;
use crate::error::{AppError, AppResult};

const BACKUP_PREFIX: &str = "stock_backup_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Backup manager
#[derive(Clone)]
pub struct BackupService {
    db: SqlitePool,
    db_path: PathBuf,
    backup_dir: PathBuf,
    retention_days: i64,
}

/// Metadata for one backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub file_name: String,
    pub path: String,
    pub created_at: NaiveDateTime,
    pub age_days: i64,
    pub size_mb: f64,
    pub compressed: bool,
}

/// Result of one automatic backup run
#[derive(Debug, Serialize)]
pub struct BackupRunResult {
    pub timestamp: String,
    pub backup_created: bool,
    pub backup_path: Option<String>,
    pub removed_backups: usize,
    pub errors: Vec<String>,
}

/// Aggregate statistics over the backup directory
#[derive(Debug, Default, Serialize)]
pub struct BackupStats {
    pub total_backups: usize,
    pub total_size_mb: f64,
    pub newest: Option<BackupInfo>,
    pub oldest: Option<BackupInfo>,
    pub compressed_count: usize,
    pub uncompressed_count: usize,
}

impl BackupService {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            db_path: PathBuf::from(&config.database.path),
            backup_dir: PathBuf::from(&config.backup.directory),
            retention_days: config.backup.retention_days,
        }
    }

    /// Create a backup, optionally gzip-compressed.
    pub async fn create_backup(&self, compress: bool) -> AppResult<BackupInfo> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| AppError::BackupError(format!("cannot create backup dir: {}", e)))?;

        let timestamp = file_timestamp(Local::now().naive_local());
        let extension = if compress { ".db.gz" } else { ".db" };
        let file_name = format!("{BACKUP_PREFIX}{timestamp}{extension}");
        let backup_path = self.backup_dir.join(&file_name);

        tracing::info!("Creating database backup: {:?}", backup_path);

        // VACUUM INTO refuses to overwrite; the timestamped name makes
        // collisions practically impossible, but clean up a stale file from
        // an interrupted earlier run.
        let snapshot_path = if compress {
            self.backup_dir.join(format!("{BACKUP_PREFIX}{timestamp}.db.tmp"))
        } else {
            backup_path.clone()
        };
        if snapshot_path.exists() {
            fs::remove_file(&snapshot_path)
                .map_err(|e| AppError::BackupError(format!("cannot clear stale file: {}", e)))?;
        }

        let snapshot_str = snapshot_path
            .to_str()
            .ok_or_else(|| AppError::BackupError("invalid backup path".to_string()))?
            .to_string();

        sqlx::query("VACUUM INTO ?")
            .bind(&snapshot_str)
            .execute(&self.db)
            .await?;

        if compress {
            gzip_file(&snapshot_path, &backup_path)
                .map_err(|e| AppError::BackupError(format!("compression failed: {}", e)))?;
            fs::remove_file(&snapshot_path).ok();
        }

        let info = self
            .describe(&backup_path)
            .ok_or_else(|| AppError::BackupError("backup file missing after creation".to_string()))?;

        tracing::info!(
            "Backup created: {} ({:.2} MB)",
            info.file_name,
            info.size_mb
        );
        Ok(info)
    }

    /// List available backups, newest first.
    pub fn list_backups(&self) -> AppResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| AppError::BackupError(format!("cannot read backup dir: {}", e)))?;

        let mut backups: Vec<BackupInfo> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| name.starts_with(BACKUP_PREFIX) && name.contains(".db"))
                    .unwrap_or(false)
            })
            .filter_map(|entry| self.describe(&entry.path()))
            .collect();

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Remove backups older than the retention period. Returns how many
    /// files were deleted.
    pub fn clean_old_backups(&self, retention_days: Option<i64>) -> AppResult<usize> {
        let retention = retention_days.unwrap_or(self.retention_days);
        let cutoff = Local::now().naive_local() - Duration::days(retention);

        let mut removed = 0;
        for backup in self.list_backups()? {
            if backup.created_at < cutoff {
                fs::remove_file(&backup.path)
                    .map_err(|e| AppError::BackupError(format!("cannot delete backup: {}", e)))?;
                removed += 1;
                tracing::info!("Old backup removed: {}", backup.file_name);
            }
        }

        tracing::info!("Backup cleanup done: {} files removed", removed);
        Ok(removed)
    }

    /// Restore the store from a backup file, taking an uncompressed safety
    /// backup of the current database first.
    pub async fn restore_backup(&self, backup_file: &str) -> AppResult<()> {
        let backup_path = self.backup_dir.join(backup_file);
        if !backup_path.exists() {
            return Err(AppError::NotFound("Backup file".to_string()));
        }

        if self.db_path.exists() {
            let safety = self.create_backup(false).await?;
            tracing::info!("Safety backup created before restore: {}", safety.file_name);
        }

        if is_compressed(&backup_path) {
            gunzip_file(&backup_path, &self.db_path)
                .map_err(|e| AppError::BackupError(format!("decompression failed: {}", e)))?;
        } else {
            fs::copy(&backup_path, &self.db_path)
                .map_err(|e| AppError::BackupError(format!("copy failed: {}", e)))?;
        }

        tracing::info!("Database restored from {}", backup_file);
        Ok(())
    }

    /// Verify a backup: the core tables must exist and SQLite's integrity
    /// check must pass.
    pub async fn verify_backup(&self, backup_file: &str) -> AppResult<bool> {
        let backup_path = self.backup_dir.join(backup_file);
        if !backup_path.exists() {
            return Err(AppError::NotFound("Backup file".to_string()));
        }

        // Work on a temporary copy so the original is never touched
        let temp_path = backup_path.with_extension("verify.tmp");
        let result = self.verify_at(&backup_path, &temp_path).await;
        fs::remove_file(&temp_path).ok();
        result
    }

    async fn verify_at(&self, backup_path: &Path, temp_path: &Path) -> AppResult<bool> {
        if is_compressed(backup_path) {
            gunzip_file(backup_path, temp_path)
                .map_err(|e| AppError::BackupError(format!("decompression failed: {}", e)))?;
        } else {
            fs::copy(backup_path, temp_path)
                .map_err(|e| AppError::BackupError(format!("copy failed: {}", e)))?;
        }

        let mut conn = SqliteConnectOptions::new()
            .filename(temp_path)
            .read_only(true)
            .connect()
            .await?;

        let tables: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sqlite_master
            WHERE type = 'table' AND name IN ('products', 'suppliers', 'purchases')
            "#,
        )
        .fetch_one(&mut conn)
        .await?;

        if tables < 3 {
            tracing::warn!("Backup incomplete: core tables missing in {:?}", backup_path);
            conn.close().await.ok();
            return Ok(false);
        }

        let integrity: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await.ok();

        Ok(integrity == "ok")
    }

    /// Full automatic run: create a compressed backup, then apply the
    /// retention policy. Errors are collected, not propagated, so a failed
    /// cleanup never hides a successful backup.
    pub async fn run_automatic(&self) -> BackupRunResult {
        tracing::info!("Starting automatic backup run...");

        let mut result = BackupRunResult {
            timestamp: Local::now().naive_local().to_string(),
            backup_created: false,
            backup_path: None,
            removed_backups: 0,
            errors: Vec::new(),
        };

        match self.create_backup(true).await {
            Ok(info) => {
                result.backup_created = true;
                result.backup_path = Some(info.path);
            }
            Err(e) => result.errors.push(format!("backup failed: {}", e)),
        }

        match self.clean_old_backups(None) {
            Ok(removed) => result.removed_backups = removed,
            Err(e) => result.errors.push(format!("cleanup failed: {}", e)),
        }

        tracing::info!(
            "Automatic backup run done: created={}, removed={}",
            result.backup_created,
            result.removed_backups
        );
        result
    }

    /// Aggregate statistics over the backup directory.
    pub fn stats(&self) -> AppResult<BackupStats> {
        let backups = self.list_backups()?;
        if backups.is_empty() {
            return Ok(BackupStats::default());
        }

        let total_size_mb = backups.iter().map(|b| b.size_mb).sum::<f64>();
        let compressed_count = backups.iter().filter(|b| b.compressed).count();

        Ok(BackupStats {
            total_backups: backups.len(),
            total_size_mb: shared::round2(total_size_mb),
            newest: backups.first().cloned(),
            oldest: backups.last().cloned(),
            compressed_count,
            uncompressed_count: backups.len() - compressed_count,
        })
    }

    fn describe(&self, path: &Path) -> Option<BackupInfo> {
        let metadata = fs::metadata(path).ok()?;
        let file_name = path.file_name()?.to_str()?.to_string();

        let created_at = parse_backup_timestamp(&file_name).or_else(|| {
            let modified = metadata.modified().ok()?;
            let since_epoch = modified.duration_since(std::time::UNIX_EPOCH).ok()?;
            chrono::DateTime::from_timestamp(since_epoch.as_secs() as i64, 0)
                .map(|dt| dt.naive_local())
        })?;

        let age_days = (Local::now().naive_local() - created_at).num_days();

        Some(BackupInfo {
            compressed: is_compressed(path),
            path: path.to_string_lossy().to_string(),
            created_at,
            age_days,
            size_mb: shared::round2(metadata.len() as f64 / (1024.0 * 1024.0)),
            file_name,
        })
    }
}

/// Extract the creation timestamp from a backup file name
/// (`stock_backup_YYYYMMDD_HHMMSS.db[.gz]`).
pub fn parse_backup_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    let stem = file_name
        .strip_prefix(BACKUP_PREFIX)?
        .trim_end_matches(".gz")
        .trim_end_matches(".db");
    NaiveDateTime::parse_from_str(stem, TIMESTAMP_FORMAT).ok()
}

fn is_compressed(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}

fn gzip_file(source: &Path, target: &Path) -> io::Result<()> {
    let mut input = File::open(source)?;
    let output = File::create(target)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    Ok(())
}

fn gunzip_file(source: &Path, target: &Path) -> io::Result<()> {
    let input = File::open(source)?;
    let mut decoder = GzDecoder::new(input);
    let mut output = File::create(target)?;
    io::copy(&mut decoder, &mut output)?;
    Ok(())
}
