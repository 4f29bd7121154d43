//! Store Server - storefront backend
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态
//! ├── auth/          # JWT 认证、密码哈希、角色授权
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (PostgreSQL)
//! └── utils/         # 错误、日志、校验工具
//! ```
//!
//! 核心是订单事务引擎 ([`db::repository::order::place_order`]):
//! 库存校验、明细创建和库存扣减在单个原子事务内完成。

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{AppState, Config};
pub use utils::{AppError, AppResult};
