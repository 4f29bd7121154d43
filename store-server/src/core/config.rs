//! Server configuration
//!
//! All settings are read from environment variables (a `.env` file is loaded
//! by `main` before this runs):
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | DATABASE_URL | (required) | PostgreSQL connection URL |
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | DB_MAX_CONNECTIONS | 10 | 连接池上限 |
//! | DB_ACQUIRE_TIMEOUT_MS | 5000 | 连接获取超时(毫秒) |
//! | JWT_SECRET | dev only | JWT 签名密钥 |
//! | JWT_EXPIRATION_MINUTES | 60 | 令牌有效期(分钟) |
//! | LOG_DIR | (unset) | 日志目录，设置后写入滚动日志文件 |
//! | ENVIRONMENT | development | 运行环境 |

use crate::auth::JwtConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP API port
    pub http_port: u16,
    /// Maximum number of pooled database connections
    pub db_max_connections: u32,
    /// How long a request may wait for a pooled connection (milliseconds)
    pub db_acquire_timeout_ms: u64,
    /// JWT signing configuration
    pub jwt: JwtConfig,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
    /// Environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let jwt_secret = Self::require_secret("JWT_SECRET", &environment)?;

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            db_acquire_timeout_ms: std::env::var("DB_ACQUIRE_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(60),
            },
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
