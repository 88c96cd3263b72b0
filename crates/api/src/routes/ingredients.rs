use axum::routing::get;
use axum::Router;

use crate::handlers::ingredients;
use crate::state::AppState;

/// Ingredient routes mounted at `/ingredients`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ingredients::list_ingredients))
        .route("/{id}", get(ingredients::get_ingredient))
}
