//! Order Repository
//!
//! Owns the order placement transaction: stock validation, line-item
//! creation, and stock decrement under a single atomic unit of work.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use super::{RepoError, RepoResult};
use crate::db::models::{OrderLineView, OrderStatus, OrderView};
use crate::utils::time::now_millis;

/// A requested order line: which product, how many units.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Order placement failures.
///
/// Business failures carry enough detail for the caller to act on; any sqlx
/// error rolls the whole transaction back before surfacing as `Database`.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Place an order for `user_id` as one atomic transaction.
///
/// For each item, in sequence order: read the product's current price and
/// stock with the row locked, fail if the product is missing or stock is
/// short, insert the line with the price just read, and decrement stock.
/// Any failure rolls back everything, including the order row, so the
/// caller observes no order and no stock change at all.
///
/// Two concurrent placements touching the same product serialize on the row
/// lock; orders for disjoint products never contend. The connection backing
/// the transaction returns to the pool on every exit path (sqlx rolls back
/// uncommitted transactions on drop).
pub async fn place_order(
    pool: &PgPool,
    user_id: i64,
    items: &[OrderItemRequest],
) -> Result<i64, OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    let mut tx = pool.begin().await?;

    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (user_id, status, created_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(OrderStatus::Pending.as_str())
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        // Lock the product row for the whole check-and-decrement step.
        let row: Option<(Decimal, i64)> =
            sqlx::query_as("SELECT price, stock FROM products WHERE id = $1 FOR UPDATE")
                .bind(item.product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((price, stock)) = row else {
            return Err(OrderError::ProductNotFound(item.product_id));
        };

        if stock < item.quantity {
            return Err(OrderError::InsufficientStock {
                product_id: item.product_id,
                available: stock,
                requested: item.quantity,
            });
        }

        // Snapshot the price read above; later price changes never touch it.
        sqlx::query(
            "INSERT INTO order_lines (order_id, product_id, quantity, unit_price)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(price)
        .execute(&mut *tx)
        .await?;

        // Conditional decrement: cannot drive stock negative even if the row
        // lock were ever bypassed.
        let updated =
            sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1")
                .bind(item.quantity)
                .bind(item.product_id)
                .execute(&mut *tx)
                .await?;

        if updated.rows_affected() == 0 {
            return Err(OrderError::InsufficientStock {
                product_id: item.product_id,
                available: stock,
                requested: item.quantity,
            });
        }
    }

    tx.commit().await?;

    tracing::info!(order_id, user_id, items = items.len(), "Order placed");

    Ok(order_id)
}

/// Administrative status update. Any status-to-status transition is
/// accepted; zero rows affected means the order does not exist.
pub async fn update_status(pool: &PgPool, order_id: i64, status: OrderStatus) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(order_id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }

    tracing::info!(order_id, status = %status, "Order status updated");

    Ok(())
}

/// All orders, most recent first (admin scope).
pub async fn list_all(pool: &PgPool) -> RepoResult<Vec<OrderView>> {
    let orders = fetch_orders(pool, None).await?;
    load_views(pool, orders).await
}

/// Orders belonging to one user, most recent first (customer scope).
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> RepoResult<Vec<OrderView>> {
    let orders = fetch_orders(pool, Some(user_id)).await?;
    load_views(pool, orders).await
}

#[derive(sqlx::FromRow)]
struct OrderHeaderRow {
    id: i64,
    user_id: i64,
    username: String,
    #[sqlx(try_from = "String")]
    status: OrderStatus,
    created_at: i64,
}

async fn fetch_orders(pool: &PgPool, user_id: Option<i64>) -> RepoResult<Vec<OrderHeaderRow>> {
    let rows = match user_id {
        Some(uid) => {
            sqlx::query_as::<_, OrderHeaderRow>(
                "SELECT o.id, o.user_id, u.username, o.status, o.created_at
                 FROM orders o
                 JOIN users u ON o.user_id = u.id
                 WHERE o.user_id = $1
                 ORDER BY o.created_at DESC",
            )
            .bind(uid)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, OrderHeaderRow>(
                "SELECT o.id, o.user_id, u.username, o.status, o.created_at
                 FROM orders o
                 JOIN users u ON o.user_id = u.id
                 ORDER BY o.created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

/// Attach line items and compute each order's total as
/// Σ(quantity × unit_price). Totals are never read from storage.
async fn load_views(pool: &PgPool, orders: Vec<OrderHeaderRow>) -> RepoResult<Vec<OrderView>> {
    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();

    let lines = sqlx::query_as::<_, OrderLineView>(
        "SELECT ol.order_id, ol.product_id, p.name AS product_name, p.image_url,
                ol.quantity, ol.unit_price
         FROM order_lines ol
         JOIN products p ON ol.product_id = p.id
         WHERE ol.order_id = ANY($1)
         ORDER BY ol.id",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut views: Vec<OrderView> = orders
        .into_iter()
        .map(|o| OrderView {
            id: o.id,
            user_id: o.user_id,
            username: o.username,
            status: o.status,
            created_at: o.created_at,
            total: Decimal::ZERO,
            lines: Vec::new(),
        })
        .collect();

    for line in lines {
        if let Some(view) = views.iter_mut().find(|v| v.id == line.order_id) {
            view.total += line.unit_price * Decimal::from(line.quantity);
            view.lines.push(line);
        }
    }

    Ok(views)
}
