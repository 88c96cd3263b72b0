//! Repository for the per-user recipe collections (`favorites`,
//! `shopping_cart`).
//!
//! Membership changes are single statements. Adding relies on the
//! `(user_id, recipe_id)` unique constraint, so two concurrent adds of the
//! same pair result in exactly one row and one `false` return.

use foodgram_core::collection::RecipeCollection;
use foodgram_core::types::DbId;
use sqlx::PgPool;

pub struct RecipeCollectionRepo;

impl RecipeCollectionRepo {
    /// Add `recipe_id` to the user's collection.
    ///
    /// Returns `false` if the pair was already present.
    pub async fn add(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (user_id, recipe_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, recipe_id) DO NOTHING
             RETURNING id",
            collection.table()
        );
        let inserted: Option<DbId> = sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;
        Ok(inserted.is_some())
    }

    /// Remove `recipe_id` from the user's collection.
    ///
    /// Returns `false` if the pair was not present.
    pub async fn remove(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn contains(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2)",
            collection.table()
        );
        sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(recipe_id)
            .fetch_one(pool)
            .await
    }
}
