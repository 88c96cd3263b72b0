use axum::routing::get;
use axum::Router;

use crate::handlers::short_links;
use crate::state::AppState;

/// Mount short-link resolution at the root (`/r/{code}`, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/r/{code}", get(short_links::resolve))
}
