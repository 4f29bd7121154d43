//! Category Model

use serde::Serialize;

/// Product category (read-only from the storefront's perspective)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
