//! Repository for the `subscriptions` table.

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::UserProfile;
use crate::repositories::user_repo::PROFILE_COLUMNS;

pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Subscribe `user_id` to `author_id`.
    ///
    /// Returns `false` if the subscription already existed. Self-subscription
    /// is rejected by a check constraint; callers validate it first.
    pub async fn add(pool: &PgPool, user_id: DbId, author_id: DbId) -> Result<bool, sqlx::Error> {
        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO subscriptions (user_id, author_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, author_id) DO NOTHING
             RETURNING id",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(pool)
        .await?;
        Ok(inserted.is_some())
    }

    /// Returns `false` if there was no such subscription.
    pub async fn remove(pool: &PgPool, user_id: DbId, author_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of the authors `user_id` follows, most recent subscription first.
    pub async fn list_authors(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS}
             FROM subscriptions sub
             JOIN users u ON u.id = sub.author_id
             WHERE sub.user_id = $1
             ORDER BY sub.created_at DESC, sub.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_authors(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
