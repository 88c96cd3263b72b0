//! Repository for the `recipe_ingredients` table.

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::{CartLine, RecipeIngredientRow};

pub struct RecipeIngredientRepo;

impl RecipeIngredientRepo {
    /// Ingredient lines of several recipes at once, ordered by ingredient
    /// name within each recipe.
    pub async fn list_for_recipes(
        pool: &PgPool,
        recipe_ids: &[DbId],
    ) -> Result<Vec<RecipeIngredientRow>, sqlx::Error> {
        sqlx::query_as::<_, RecipeIngredientRow>(
            "SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = ANY($1)
             ORDER BY ri.recipe_id, i.name, i.measurement_unit",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await
    }

    /// Every ingredient line of every recipe in the user's shopping cart, in
    /// one query. Lines are not merged; aggregation happens in
    /// `foodgram_core::shopping_list`.
    pub async fn list_cart_lines(pool: &PgPool, user_id: DbId) -> Result<Vec<CartLine>, sqlx::Error> {
        sqlx::query_as::<_, CartLine>(
            "SELECT i.name, i.measurement_unit, ri.amount
             FROM shopping_cart c
             JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE c.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
