//! Product API Handlers
//!
//! Reads are public; catalog mutations require the admin role.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{ProductCreate, ProductUpdate, ProductWithCategory, Role};
use crate::db::repository::product;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatedResponse {
    pub message: String,
    pub product_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn validate_fields(
    name: &str,
    description: &Option<String>,
    price: rust_decimal::Decimal,
    stock: i64,
    image_url: &Option<String>,
) -> Result<(), AppError> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(image_url, "imageUrl", MAX_URL_LEN)?;
    if price.is_sign_negative() {
        return Err(AppError::validation("price must not be negative"));
    }
    if stock < 0 {
        return Err(AppError::validation("stock must not be negative"));
    }
    Ok(())
}

/// GET /api/products - 获取所有商品 (public, name ascending)
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProductWithCategory>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - 获取单个商品 (public)
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithCategory>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品 (admin)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> Result<(StatusCode, Json<ProductCreatedResponse>), AppError> {
    user.authorize(Role::Admin)?;
    validate_fields(
        &payload.name,
        &payload.description,
        payload.price,
        payload.stock,
        &payload.image_url,
    )?;

    let product_id = product::create(&state.pool, payload)
        .await?;

    tracing::info!(product_id, admin_id = user.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product created successfully".to_string(),
            product_id,
        }),
    ))
}

/// PUT /api/products/{id} - 更新商品 (admin, absolute field set)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<MessageResponse>> {
    user.authorize(Role::Admin)?;
    validate_fields(
        &payload.name,
        &payload.description,
        payload.price,
        payload.stock,
        &payload.image_url,
    )?;

    product::update(&state.pool, id, payload)
        .await?;

    tracing::info!(product_id = id, admin_id = user.id, "Product updated");

    Ok(Json(MessageResponse {
        message: "Product updated successfully".to_string(),
    }))
}

/// DELETE /api/products/{id} - 删除商品 (admin)
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    user.authorize(Role::Admin)?;

    product::delete(&state.pool, id)
        .await?;

    tracing::info!(product_id = id, admin_id = user.id, "Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
