//! Recipe models: full rows, compact summaries, composition rows, and DTOs.

use foodgram_core::recipe::IngredientAmount;
use foodgram_core::shopping_list::IngredientLine;
use foodgram_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::tag::Tag;

/// A recipe row joined with the viewer's collection flags.
///
/// Both flags are `false` for anonymous viewers.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: DbId,
    pub author_id: DbId,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub short_code: Option<String>,
    pub pub_date: Timestamp,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Compact recipe representation used by collection actions and
/// subscription listings.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeSummary {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

/// One ingredient of a recipe, with its catalog data.
///
/// `id` is the ingredient id, not the `recipe_ingredients` row id.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeIngredientView {
    pub id: DbId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A recipe ingredient line drawn from a user's shopping cart.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<CartLine> for IngredientLine {
    fn from(line: CartLine) -> Self {
        IngredientLine {
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Validated input for creating or replacing a recipe.
///
/// `image` is required on create; on update `None` keeps the stored image.
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub tag_ids: Vec<DbId>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Filters for the recipe list. Unset filters do not restrict the result.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<DbId>,
    /// Recipes carrying any of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Only recipes in the viewer's favorites.
    pub favorited_only: bool,
    /// Only recipes in the viewer's shopping cart.
    pub in_cart_only: bool,
}

/// A tag attached to a recipe, tagged with the recipe it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeTagRow {
    pub recipe_id: DbId,
    #[sqlx(flatten)]
    pub tag: Tag,
}

/// An ingredient line tagged with the recipe it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRow {
    pub recipe_id: DbId,
    #[sqlx(flatten)]
    pub ingredient: RecipeIngredientView,
}
