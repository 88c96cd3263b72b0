pub mod auth;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod short_links;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/token/login                       login (public)
/// /auth/token/logout                      logout (requires auth)
///
/// /users                                  list (public), register (public)
/// /users/me                               own profile (requires auth)
/// /users/me/avatar                        set, clear avatar (requires auth)
/// /users/set_password                     change password (requires auth)
/// /users/subscriptions                    followed authors (requires auth)
/// /users/{id}                             profile (public)
/// /users/{id}/subscribe                   subscribe, unsubscribe (requires auth)
///
/// /tags                                   list (public)
/// /tags/{id}                              get (public)
///
/// /ingredients                            list with ?name= prefix (public)
/// /ingredients/{id}                       get (public)
///
/// /recipes                                list (public), create (requires auth)
/// /recipes/download_shopping_cart         shopping list file (requires auth)
/// /recipes/{id}                           get (public), update, delete (author/admin)
/// /recipes/{id}/get-link                  short link (public)
/// /recipes/{id}/favorite                  add, remove (requires auth)
/// /recipes/{id}/shopping_cart             add, remove (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth/token", auth::router())
        .nest("/users", users::router())
        .nest("/tags", tags::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
}
