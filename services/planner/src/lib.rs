//! services/planner/src/lib.rs
//!
//! Wires a storage backend into the scheduling core: configuration, the
//! service error type, the port adapters, and the `PlannerService` facade.

pub mod adapters;
pub mod config;
pub mod error;
pub mod service;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studyplan_core::clock::SystemClock;

pub use adapters::{MemoryStore, PgStore};
pub use config::{Config, ConfigError, StorageBackend};
pub use error::PlannerError;
pub use service::PlannerService;

/// Sets up the global tracing subscriber. Call once at startup.
pub fn init_tracing(level: tracing::Level) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Builds a `PlannerService` on the backend the configuration selects,
/// running migrations when the backend is Postgres.
pub async fn build_service(config: &Config) -> Result<PlannerService, PlannerError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using the in-memory store");
            let store = Arc::new(MemoryStore::new());
            Ok(PlannerService::new(
                store.clone(),
                store.clone(),
                store,
                Arc::new(SystemClock),
            ))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
            info!("Connecting to database...");
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            let store = Arc::new(PgStore::new(pool));
            info!("Running database migrations...");
            store.run_migrations().await.map_err(sqlx::Error::from)?;
            Ok(PlannerService::new(
                store.clone(),
                store.clone(),
                store,
                Arc::new(SystemClock),
            ))
        }
    }
}
