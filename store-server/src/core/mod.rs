//! 核心模块 - 服务器配置和状态
//!
//! - [`Config`] - 服务器配置
//! - [`AppState`] - 共享应用状态

pub mod config;
pub mod state;

pub use config::Config;
pub use state::AppState;
