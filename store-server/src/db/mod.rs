//! Database Module
//!
//! Handles the PostgreSQL connection pool and migrations.

pub mod models;
pub mod repository;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::core::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Open a bounded connection pool and apply pending migrations.
///
/// Requests beyond `db_max_connections` queue on `acquire` until a
/// connection frees up or the acquire timeout elapses.
pub async fn connect(config: &Config) -> Result<PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_millis(config.db_acquire_timeout_ms))
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connection pool established"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
