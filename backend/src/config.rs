//! Configuration management for the Bar Stock Tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BST_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Backup configuration
    pub backup: BackupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection URL for the pool, creating the file on first run.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupConfig {
    /// Directory where backups are written
    pub directory: String,

    /// Days to keep old backups before cleanup
    pub retention_days: i64,

    /// Whether automatic backups are gzip-compressed
    pub compress: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("BST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("database.path", "stock.db")?
            .set_default("database.max_connections", 5)?
            .set_default("backup.directory", "backups")?
            .set_default("backup.retention_days", 30)?
            .set_default("backup.compress", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BST_ prefix)
            .add_source(
                Environment::with_prefix("BST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}
