//! Handlers for the read-only tag catalog.

use axum::extract::{Path, State};
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::types::DbId;
use foodgram_db::models::tag::Tag;
use foodgram_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(TagRepo::list(&state.pool).await?))
}

/// GET /api/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Tag>> {
    TagRepo::find_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))
}
