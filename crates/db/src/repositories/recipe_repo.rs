//! Repository for the `recipes` table and its tag / ingredient composition.
//!
//! Composition rows are always replaced wholesale inside the transaction
//! that writes the recipe, so readers never observe a half-updated recipe.

use foodgram_core::recipe::IngredientAmount;
use foodgram_core::short_code::ShortCodeCodec;
use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::{Recipe, RecipeFilter, RecipeInput, RecipeSummary};

/// Recipe columns plus the viewer's collection flags. `$1` is the viewer id
/// (NULL for anonymous viewers).
const COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.image, r.cooking_time, \
     r.short_code, r.pub_date, \
     EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = $1) \
         AS is_favorited, \
     EXISTS (SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = $1) \
         AS is_in_shopping_cart";

const SUMMARY_COLUMNS: &str = "id, name, image, cooking_time";

/// List filter. Binds `$2` author, `$3` tag slugs, `$4` favorited-only,
/// `$5` in-cart-only; the collection filters test against viewer `$1`.
const FILTER: &str = "($2::BIGINT IS NULL OR r.author_id = $2) \
     AND (cardinality($3::TEXT[]) = 0 OR EXISTS ( \
         SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
         WHERE rt.recipe_id = r.id AND t.slug = ANY($3))) \
     AND (NOT $4::BOOLEAN OR EXISTS ( \
         SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = $1)) \
     AND (NOT $5::BOOLEAN OR EXISTS ( \
         SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = $1))";

pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a recipe with its tags and ingredients, and stamp its short
    /// code, all in one transaction. Returns the new id.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &RecipeInput,
        short_codes: &ShortCodeCodec,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO recipes (author_id, name, text, image, cooking_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(author_id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(&input.image)
        .bind(input.cooking_time)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE recipes SET short_code = $2 WHERE id = $1")
            .bind(id)
            .bind(short_codes.encode_db_id(id))
            .execute(&mut *tx)
            .await?;

        Self::replace_composition_inner(&mut tx, id, &input.tag_ids, &input.ingredients).await?;

        tx.commit().await?;
        tracing::debug!(recipe_id = id, author_id, "Recipe created");
        Ok(id)
    }

    /// Replace a recipe's fields and composition. A `None` image keeps the
    /// stored one; the short code is never rewritten.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &RecipeInput) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE recipes SET
                name = $2,
                text = $3,
                image = COALESCE($4, image),
                cooking_time = $5
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(&input.image)
        .bind(input.cooking_time)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if !updated {
            return Ok(false);
        }

        Self::replace_composition_inner(&mut tx, id, &input.tag_ids, &input.ingredients).await?;

        tx.commit().await?;
        tracing::debug!(recipe_id = id, "Recipe updated");
        Ok(true)
    }

    /// Delete a recipe. Composition and collection rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a recipe as seen by `viewer`.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes r WHERE r.id = $2");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RecipeSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM recipes WHERE id = $1");
        sqlx::query_as::<_, RecipeSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store `short_code` unless the recipe already has one, and return the
    /// code now on record. `None` when the recipe does not exist.
    pub async fn ensure_short_code(
        pool: &PgPool,
        id: DbId,
        short_code: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE recipes SET short_code = COALESCE(short_code, $2)
             WHERE id = $1
             RETURNING short_code",
        )
        .bind(id)
        .bind(short_code)
        .fetch_optional(pool)
        .await
        .map(Option::flatten)
    }

    /// Resolve a stored short code to its recipe id.
    pub async fn find_id_by_short_code(
        pool: &PgPool,
        short_code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM recipes WHERE short_code = $1")
            .bind(short_code)
            .fetch_optional(pool)
            .await
    }

    /// One page of recipes matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        viewer: Option<DbId>,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipes r
             WHERE {FILTER}
             ORDER BY r.pub_date DESC, r.id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer)
            .bind(filter.author_id)
            .bind(&filter.tag_slugs)
            .bind(filter.favorited_only)
            .bind(filter.in_cart_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of recipes matching `filter`.
    pub async fn count(
        pool: &PgPool,
        viewer: Option<DbId>,
        filter: &RecipeFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM recipes r WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(viewer)
            .bind(filter.author_id)
            .bind(&filter.tag_slugs)
            .bind(filter.favorited_only)
            .bind(filter.in_cart_only)
            .fetch_one(pool)
            .await
    }

    /// An author's recipes, newest first. `limit = None` returns all of them.
    pub async fn list_summaries_by_author(
        pool: &PgPool,
        author_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<RecipeSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM recipes
             WHERE author_id = $1
             ORDER BY pub_date DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, RecipeSummary>(&query)
            .bind(author_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_author(pool: &PgPool, author_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    async fn replace_composition_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        recipe_id: DbId,
        tag_ids: &[DbId],
        ingredients: &[IngredientAmount],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;

        for &tag_id in tag_ids {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut **tx)
                .await?;
        }

        for entry in ingredients {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount)
                 VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(entry.id)
            .bind(entry.amount)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
