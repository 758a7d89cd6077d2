//! Dynamic application configuration stored in the database
//!
//! The alert engine reads its thresholds through this service; every key has
//! a hardcoded fallback so a missing row never breaks rule evaluation.

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::ConfigEntry;

/// Configuration key/value service
#[derive(Clone)]
pub struct AppConfigService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ConfigRow {
    key: String,
    value: String,
    description: Option<String>,
    last_modified: String,
}

impl From<ConfigRow> for ConfigEntry {
    fn from(row: ConfigRow) -> Self {
        ConfigEntry {
            key: row.key,
            value: row.value,
            description: row.description,
            last_modified: row.last_modified,
        }
    }
}

impl AppConfigService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get a configuration value, falling back to `default` when the key is
    /// absent or the store is unreachable.
    pub async fn get(&self, key: &str, default: &str) -> String {
        let result = sqlx::query_scalar::<_, String>("SELECT value FROM app_config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await;

        match result {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                tracing::warn!("Config lookup for '{}' failed: {}", key, e);
                default.to_string()
            }
        }
    }

    /// Get a numeric configuration value with a fallback default.
    pub async fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get(key, &default.to_string())
            .await
            .parse()
            .unwrap_or(default)
    }

    /// Get an integer configuration value with a fallback default.
    pub async fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get(key, &default.to_string())
            .await
            .parse()
            .unwrap_or(default)
    }

    /// Upsert a configuration value, stamping the modification time.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> AppResult<ConfigEntry> {
        shared::validate_config_key(key).map_err(|msg| AppError::validation("key", msg))?;
        shared::validate_config_value(value).map_err(|msg| AppError::validation("value", msg))?;

        let entry = sqlx::query_as::<_, ConfigRow>(
            r#"
            INSERT INTO app_config (key, value, description, last_modified)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                description = COALESCE(excluded.description, app_config.description),
                last_modified = CURRENT_TIMESTAMP
            RETURNING key, value, description, last_modified
            "#,
        )
        .bind(key.trim())
        .bind(value)
        .bind(description)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Configuration updated: {} = {}", key, value);
        Ok(entry.into())
    }

    /// Fetch a single entry, erroring when the key does not exist.
    pub async fn get_entry(&self, key: &str) -> AppResult<ConfigEntry> {
        let row = sqlx::query_as::<_, ConfigRow>(
            "SELECT key, value, description, last_modified FROM app_config WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Configuration key".to_string()))?;

        Ok(row.into())
    }

    /// List every configuration entry.
    pub async fn list(&self) -> AppResult<Vec<ConfigEntry>> {
        let rows = sqlx::query_as::<_, ConfigRow>(
            "SELECT key, value, description, last_modified FROM app_config ORDER BY key",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ConfigEntry::from).collect())
    }
}
