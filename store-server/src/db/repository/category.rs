//! Category Repository

use sqlx::PgPool;

use super::RepoResult;
use crate::db::models::Category;

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}
