//! Handlers for the read-only ingredient catalog.

use axum::extract::{Path, Query, State};
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::types::DbId;
use foodgram_db::models::ingredient::Ingredient;
use foodgram_db::repositories::IngredientRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// GET /api/ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientSearch>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let ingredients = IngredientRepo::list(&state.pool, params.name.as_deref()).await?;
    Ok(Json(ingredients))
}

/// GET /api/ingredients/{id}
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ingredient>> {
    IngredientRepo::find_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ingredient",
            id,
        }))
}
