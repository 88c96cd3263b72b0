//! Repository for the `ingredients` table.

use foodgram_core::catalog_import::NewIngredient;
use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::ingredient::Ingredient;

const COLUMNS: &str = "id, name, measurement_unit";

pub struct IngredientRepo;

impl IngredientRepo {
    /// Ingredients ordered by name, optionally restricted to names starting
    /// with `name_prefix` (case-insensitive).
    pub async fn list(
        pool: &PgPool,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        let pattern = name_prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}%", escape_like(&p.to_lowercase())));
        let query = format!(
            "SELECT {COLUMNS} FROM ingredients
             WHERE ($1::TEXT IS NULL OR LOWER(name) LIKE $1)
             ORDER BY name ASC, measurement_unit ASC"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE id = $1");
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The subset of `ids` that exist.
    pub async fn find_existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM ingredients WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Insert catalog entries in one transaction, skipping pairs that already
    /// exist. Returns the number of rows actually inserted.
    pub async fn insert_many(
        pool: &PgPool,
        entries: &[NewIngredient],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;
        for entry in entries {
            let result = sqlx::query(
                "INSERT INTO ingredients (name, measurement_unit)
                 VALUES ($1, $2)
                 ON CONFLICT (name, measurement_unit) DO NOTHING",
            )
            .bind(&entry.name)
            .bind(&entry.measurement_unit)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("flour"), "flour");
    }
}
