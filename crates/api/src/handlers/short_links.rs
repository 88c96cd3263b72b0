//! Short-link resolution.

use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use foodgram_core::error::CoreError;
use foodgram_db::repositories::RecipeRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /r/{code}
///
/// Redirect (302) to the recipe page behind a short code. Codes that do not
/// decode under the configured salt, or that name no stored recipe, are 404.
pub async fn resolve(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let unknown = || CoreError::UnknownShortCode(code.clone());

    let decoded = state.short_codes.decode_db_id(&code).ok_or_else(unknown)?;
    let recipe_id = RecipeRepo::find_id_by_short_code(&state.pool, &code)
        .await?
        .filter(|id| *id == decoded)
        .ok_or_else(unknown)?;

    tracing::debug!(%code, recipe_id, "Short link resolved");

    let location = state.public_url(&format!("/recipes/{recipe_id}"));
    Ok((StatusCode::FOUND, [(LOCATION, location)]))
}
