//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state, cheap to clone and held by every handler.
///
/// The connection pool is the only shared mutable resource: it is created
/// once at startup and checked out per transaction. No catalog data is
/// cached in memory; stock and price are always read inside the transaction
/// that uses them.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// Bounded PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT token service
    pub jwt: Arc<JwtService>,
}

impl AppState {
    /// Create the application state: open the pool and apply migrations.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(config).await?;
        let jwt = Arc::new(JwtService::new(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            pool,
            jwt,
        })
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt.clone()
    }
}
