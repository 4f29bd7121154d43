//! Order transaction engine integration tests
//!
//! Each test runs against its own migrated database provided by
//! `#[sqlx::test]`.

use rust_decimal::Decimal;
use sqlx::PgPool;

use store_server::db::models::{OrderStatus, Role};
use store_server::db::models::{ProductCreate, ProductUpdate};
use store_server::db::repository::order::{OrderError, OrderItemRequest, place_order};
use store_server::db::repository::{RepoError, order, product, user};

// ── Fixtures ────────────────────────────────────────────────────────

async fn seed_category(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("insert category")
}

async fn seed_product(pool: &PgPool, name: &str, price: &str, stock: i64) -> i64 {
    let category_id = seed_category(pool, &format!("cat-{name}")).await;
    product::create(
        pool,
        ProductCreate {
            name: name.to_string(),
            description: None,
            price: price.parse().unwrap(),
            stock,
            category_id,
            image_url: None,
        },
    )
    .await
    .expect("insert product")
}

async fn seed_user(pool: &PgPool, email: &str, role: Role) -> i64 {
    user::create(pool, "test-user", email, "not-a-real-hash", role)
        .await
        .expect("insert user")
}

async fn stock_of(pool: &PgPool, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("read stock")
}

async fn order_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .expect("count orders")
}

fn items(entries: &[(i64, i64)]) -> Vec<OrderItemRequest> {
    entries
        .iter()
        .map(|&(product_id, quantity)| OrderItemRequest {
            product_id,
            quantity,
        })
        .collect()
}

// ── Placement ───────────────────────────────────────────────────────

#[sqlx::test]
async fn placement_decrements_stock_and_computes_total(pool: PgPool) {
    let user_id = seed_user(&pool, "buyer@example.com", Role::Customer).await;
    let product_id = seed_product(&pool, "widget", "10.00", 5).await;

    let order_id = place_order(&pool, user_id, &items(&[(product_id, 2)]))
        .await
        .expect("order should succeed");

    assert_eq!(stock_of(&pool, product_id).await, 3);

    let views = order::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.id, order_id);
    assert_eq!(view.status, OrderStatus::Pending);
    assert_eq!(view.total, "20.00".parse::<Decimal>().unwrap());
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 2);
}

#[sqlx::test]
async fn unit_price_snapshot_survives_price_changes(pool: PgPool) {
    let user_id = seed_user(&pool, "buyer@example.com", Role::Customer).await;
    let product_id = seed_product(&pool, "widget", "10.00", 5).await;

    place_order(&pool, user_id, &items(&[(product_id, 2)]))
        .await
        .unwrap();

    // Admin repricing after the fact must not touch the captured snapshot.
    product::update(
        &pool,
        product_id,
        ProductUpdate {
            name: "widget".to_string(),
            description: None,
            price: "99.99".parse().unwrap(),
            stock: 3,
            category_id: sqlx::query_scalar("SELECT category_id FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_one(&pool)
                .await
                .unwrap(),
            image_url: None,
        },
    )
    .await
    .unwrap();

    let views = order::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(views[0].total, "20.00".parse::<Decimal>().unwrap());
    assert_eq!(
        views[0].lines[0].unit_price,
        "10.00".parse::<Decimal>().unwrap()
    );
}

#[sqlx::test]
async fn empty_order_is_rejected(pool: PgPool) {
    let user_id = seed_user(&pool, "buyer@example.com", Role::Customer).await;

    let result = place_order(&pool, user_id, &[]).await;
    assert!(matches!(result, Err(OrderError::EmptyOrder)));
    assert_eq!(order_count(&pool).await, 0);
}

#[sqlx::test]
async fn missing_product_rolls_back_everything(pool: PgPool) {
    let user_id = seed_user(&pool, "buyer@example.com", Role::Customer).await;
    let product_id = seed_product(&pool, "widget", "10.00", 5).await;

    // First item is valid, second does not exist; nothing may survive.
    let result = place_order(&pool, user_id, &items(&[(product_id, 2), (999_999, 1)])).await;

    assert!(matches!(result, Err(OrderError::ProductNotFound(999_999))));
    assert_eq!(order_count(&pool).await, 0);
    assert_eq!(stock_of(&pool, product_id).await, 5);
}

#[sqlx::test]
async fn insufficient_stock_reports_detail_and_rolls_back(pool: PgPool) {
    let user_id = seed_user(&pool, "buyer@example.com", Role::Customer).await;
    let cheap = seed_product(&pool, "cheap", "1.00", 10).await;
    let scarce = seed_product(&pool, "scarce", "5.00", 1).await;

    let result = place_order(&pool, user_id, &items(&[(cheap, 3), (scarce, 5)])).await;

    match result {
        Err(OrderError::InsufficientStock {
            product_id,
            available,
            requested,
        }) => {
            assert_eq!(product_id, scarce);
            assert_eq!(available, 1);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // The earlier item's decrement must have been rolled back too.
    assert_eq!(stock_of(&pool, cheap).await, 10);
    assert_eq!(stock_of(&pool, scarce).await, 1);
    assert_eq!(order_count(&pool).await, 0);
}

#[sqlx::test]
async fn concurrent_placements_never_oversell(pool: PgPool) {
    let product_id = seed_product(&pool, "limited", "10.00", 3).await;

    let mut buyers = Vec::new();
    for i in 0..8 {
        buyers.push(seed_user(&pool, &format!("buyer{i}@example.com"), Role::Customer).await);
    }

    let mut tasks = Vec::new();
    for user_id in buyers {
        let pool = pool.clone();
        tasks.push(tokio::spawn(async move {
            place_order(&pool, user_id, &[OrderItemRequest {
                product_id,
                quantity: 1,
            }])
            .await
        }));
    }

    let mut succeeded = 0;
    let mut out_of_stock = 0;
    for task in tasks {
        match task.await.expect("task panicked") {
            Ok(_) => succeeded += 1,
            Err(OrderError::InsufficientStock { .. }) => out_of_stock += 1,
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(out_of_stock, 5);
    assert_eq!(stock_of(&pool, product_id).await, 0);
    assert_eq!(order_count(&pool).await, 3);
}

// ── Status updates ──────────────────────────────────────────────────

#[sqlx::test]
async fn status_update_persists(pool: PgPool) {
    let user_id = seed_user(&pool, "buyer@example.com", Role::Customer).await;
    let product_id = seed_product(&pool, "widget", "10.00", 5).await;
    let order_id = place_order(&pool, user_id, &items(&[(product_id, 1)]))
        .await
        .unwrap();

    order::update_status(&pool, order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    let views = order::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(views[0].status, OrderStatus::Shipped);
}

#[sqlx::test]
async fn status_update_on_missing_order_is_not_found(pool: PgPool) {
    let result = order::update_status(&pool, 424_242, OrderStatus::Confirmed).await;
    assert!(matches!(result, Err(RepoError::NotFound(_))));
}

// ── Query scoping ───────────────────────────────────────────────────

#[sqlx::test]
async fn listing_is_scoped_by_user_and_sorted_newest_first(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com", Role::Customer).await;
    let bob = seed_user(&pool, "bob@example.com", Role::Customer).await;
    let product_id = seed_product(&pool, "widget", "10.00", 100).await;

    let first = place_order(&pool, alice, &items(&[(product_id, 1)]))
        .await
        .unwrap();
    let second = place_order(&pool, alice, &items(&[(product_id, 2)]))
        .await
        .unwrap();
    let bobs = place_order(&pool, bob, &items(&[(product_id, 3)]))
        .await
        .unwrap();

    // Spread creation timestamps so the ordering assertion is deterministic.
    for (order_id, ts) in [(first, 1_000), (second, 2_000), (bobs, 3_000)] {
        sqlx::query("UPDATE orders SET created_at = $1 WHERE id = $2")
            .bind(ts as i64)
            .bind(order_id)
            .execute(&pool)
            .await
            .unwrap();
    }

    let alices_view = order::list_for_user(&pool, alice).await.unwrap();
    assert_eq!(alices_view.len(), 2);
    assert!(alices_view.iter().all(|o| o.user_id == alice));
    assert_eq!(alices_view[0].id, second);
    assert_eq!(alices_view[1].id, first);

    let all = order::list_all(&pool).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, bobs);
}

// ── Registration ────────────────────────────────────────────────────

#[sqlx::test]
async fn duplicate_email_is_rejected(pool: PgPool) {
    seed_user(&pool, "taken@example.com", Role::Customer).await;

    let result = user::create(
        &pool,
        "someone-else",
        "taken@example.com",
        "hash",
        Role::Customer,
    )
    .await;

    assert!(matches!(result, Err(RepoError::Duplicate(_))));
}
