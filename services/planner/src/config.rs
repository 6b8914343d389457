//! services/planner/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which persistence adapter the planner is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-process maps; the browser-local key-value analog.
    Memory,
    /// PostgreSQL via sqlx.
    Postgres,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub backend: StorageBackend,
    /// Required only for the `postgres` backend.
    pub database_url: Option<String>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let backend_str =
            std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string());
        let backend = match backend_str.to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE_BACKEND".to_string(),
                    format!("'{}' is not a supported backend", other),
                ))
            }
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            backend,
            database_url,
            log_level,
        })
    }
}
