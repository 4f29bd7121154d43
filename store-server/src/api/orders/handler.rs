//! Order API Handlers
//!
//! Placement (customer), role-scoped listing, and administrative status
//! updates.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{OrderStatus, OrderView, Role};
use crate::db::repository::order::{self, OrderItemRequest};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub message: String,
    pub order_id: i64,
    pub status: OrderStatus,
}

/// POST /api/orders - place an order (customer)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), AppError> {
    user.authorize(Role::Customer)?;

    for item in &req.items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }
    }

    let order_id = order::place_order(&state.pool, user.id, &req.items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully".to_string(),
            order_id,
        }),
    ))
}

/// GET /api/orders - role-scoped order list, most recent first
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = match user.role {
        Role::Admin => order::list_all(&state.pool).await,
        Role::Customer => order::list_for_user(&state.pool, user.id).await,
    }?;

    Ok(Json(orders))
}

/// PUT /api/orders/{id} - update order status (admin)
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<UpdateStatusResponse>> {
    user.authorize(Role::Admin)?;

    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid order status: {}", req.status)))?;

    order::update_status(&state.pool, id, status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        message: "Order status updated successfully".to_string(),
        order_id: id,
        status,
    }))
}
