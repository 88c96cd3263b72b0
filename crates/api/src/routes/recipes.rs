use axum::routing::{get, post};
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// Recipe routes mounted at `/recipes`.
///
/// ```text
/// GET    /                          -> list_recipes
/// POST   /                          -> create_recipe
/// GET    /download_shopping_cart    -> download_shopping_cart
/// GET    /{id}                      -> get_recipe
/// PATCH  /{id}                      -> update_recipe
/// DELETE /{id}                      -> delete_recipe
/// GET    /{id}/get-link             -> get_link
/// POST   /{id}/favorite             -> add_favorite
/// DELETE /{id}/favorite             -> remove_favorite
/// POST   /{id}/shopping_cart        -> add_to_cart
/// DELETE /{id}/shopping_cart        -> remove_from_cart
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list_recipes).post(recipes::create_recipe))
        .route(
            "/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/{id}/get-link", get(recipes::get_link))
        .route(
            "/{id}/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
}
