//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product joined with its category name (list/detail views)
///
/// `stock` is mutated only by the order transaction (decrement) or an
/// administrative update (absolute set); it must never go negative.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: i64,
    pub category_name: String,
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Update product payload (absolute field set, stock included)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}
