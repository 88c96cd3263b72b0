//! Repository for the `tags` table.

use foodgram_core::catalog_import::NewTag;
use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::RecipeTagRow;
use crate::models::tag::Tag;

const COLUMNS: &str = "id, name, color, slug";

pub struct TagRepo;

impl TagRepo {
    /// All tags ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The subset of `ids` that exist.
    pub async fn find_existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Tags of several recipes at once, ordered by name within each recipe.
    pub async fn list_for_recipes(
        pool: &PgPool,
        recipe_ids: &[DbId],
    ) -> Result<Vec<RecipeTagRow>, sqlx::Error> {
        sqlx::query_as::<_, RecipeTagRow>(
            "SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
             FROM recipe_tags rt
             JOIN tags t ON t.id = rt.tag_id
             WHERE rt.recipe_id = ANY($1)
             ORDER BY rt.recipe_id, t.name, t.id",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await
    }

    /// Insert a tag, or update name and color of the tag with the same slug.
    pub async fn upsert(pool: &PgPool, input: &NewTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug, color)
             VALUES ($1, $2, $3)
             ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name, color = EXCLUDED.color
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(input.name.trim())
            .bind(input.slug.trim())
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }
}
