//! Product Repository
//!
//! Catalog reads join the category name the way the storefront displays it.
//! Stock decrements do NOT live here; they are part of the order placement
//! transaction in [`super::order`].

use sqlx::PgPool;

use super::{RepoError, RepoResult};
use crate::db::models::{ProductCreate, ProductUpdate, ProductWithCategory};
use crate::utils::time::now_millis;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.stock, \
     p.category_id, c.name AS category_name, p.image_url, p.created_at";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<ProductWithCategory>> {
    let products = sqlx::query_as::<_, ProductWithCategory>(&format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM products p
         JOIN categories c ON p.category_id = c.id
         ORDER BY p.name ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<ProductWithCategory>> {
    let product = sqlx::query_as::<_, ProductWithCategory>(&format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM products p
         JOIN categories c ON p.category_id = c.id
         WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Insert a new product, returning the generated id.
pub async fn create(pool: &PgPool, data: ProductCreate) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, description, price, stock, category_id, image_url, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(&data.name)
    .bind(data.description.as_deref().unwrap_or(""))
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepoError::Validation(format!("category {} does not exist", data.category_id))
        }
        _ => RepoError::from(e),
    })?;

    Ok(id)
}

/// Absolute update of every product field, stock included.
pub async fn update(pool: &PgPool, id: i64, data: ProductUpdate) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE products
         SET name = $1, description = $2, price = $3, stock = $4, category_id = $5, image_url = $6
         WHERE id = $7",
    )
    .bind(&data.name)
    .bind(data.description.as_deref().unwrap_or(""))
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepoError::Validation(format!("category {} does not exist", data.category_id))
        }
        _ => RepoError::from(e),
    })?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepoError::Validation(format!("product {id} is referenced by existing orders"))
            }
            _ => RepoError::from(e),
        })?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}
