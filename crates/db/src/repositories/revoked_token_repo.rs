//! Repository for the `revoked_tokens` table.
//!
//! Logout records the access token's `jti` here; the auth extractor rejects
//! any token whose `jti` is present.

use foodgram_core::types::{DbId, Timestamp};
use sqlx::PgPool;

pub struct RevokedTokenRepo;

impl RevokedTokenRepo {
    /// Revoke a token. Revoking the same `jti` twice is a no-op.
    pub async fn revoke(
        pool: &PgPool,
        jti: &str,
        user_id: DbId,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO revoked_tokens (jti, user_id, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        let (revoked,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(pool)
                .await?;
        Ok(revoked)
    }

    /// Delete entries whose token has expired anyway. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
