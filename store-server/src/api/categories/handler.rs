//! Category API Handlers

use axum::{Json, extract::State};

use crate::core::AppState;
use crate::db::models::Category;
use crate::db::repository::category;
use crate::utils::AppResult;

/// GET /api/categories - 获取所有分类 (name ascending)
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}
