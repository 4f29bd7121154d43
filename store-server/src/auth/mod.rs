//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务 (签发/校验)
//! - [`CurrentUser`] - 当前用户上下文 (axum extractor)
//! - [`password`] - argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
