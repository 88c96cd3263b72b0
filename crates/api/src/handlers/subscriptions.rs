//! Handlers for author subscriptions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::pagination::{parse_optional_limit, Page};
use foodgram_core::types::DbId;
use foodgram_db::models::recipe::RecipeSummary;
use foodgram_db::models::user::UserProfile;
use foodgram_db::repositories::{RecipeRepo, SubscriptionRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListQuery;
use crate::state::AppState;

/// A followed author with a preview of their recipes.
#[derive(Debug, Serialize)]
pub struct Subscription {
    #[serde(flatten)]
    pub author: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

/// GET /api/users/subscriptions
///
/// Authors the caller follows. `recipes_limit` caps each recipe preview.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
    query: ListQuery,
) -> AppResult<Json<Page<Subscription>>> {
    let page = query.page_request();
    let recipes_limit = parse_optional_limit(query.first("recipes_limit"));

    let count = SubscriptionRepo::count_authors(&state.pool, auth.user_id).await?;
    let authors =
        SubscriptionRepo::list_authors(&state.pool, auth.user_id, page.limit, page.offset())
            .await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in authors {
        results.push(with_recipes(&state, author, recipes_limit).await?);
    }

    Ok(Json(query.page_of(page, count, results)))
}

/// POST /api/users/{id}/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(author_id): Path<DbId>,
    query: ListQuery,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    if author_id == auth.user_id {
        return Err(CoreError::Validation("You cannot subscribe to yourself".into()).into());
    }

    let author = UserRepo::find_profile(&state.pool, author_id, Some(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: author_id,
        }))?;

    if !SubscriptionRepo::add(&state.pool, auth.user_id, author_id).await? {
        return Err(CoreError::DuplicateEntry(format!(
            "You are already subscribed to user {author_id}"
        ))
        .into());
    }

    tracing::info!(user_id = auth.user_id, author_id, "Subscribed");

    let author = UserProfile {
        is_subscribed: true,
        ..author
    };
    let recipes_limit = parse_optional_limit(query.first("recipes_limit"));
    let subscription = with_recipes(&state, author, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// DELETE /api/users/{id}/subscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(author_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UserRepo::find_by_id(&state.pool, author_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: author_id,
        }));
    }

    if !SubscriptionRepo::remove(&state.pool, auth.user_id, author_id).await? {
        return Err(CoreError::MissingEntry(format!(
            "You are not subscribed to user {author_id}"
        ))
        .into());
    }

    tracing::info!(user_id = auth.user_id, author_id, "Unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}

async fn with_recipes(
    state: &AppState,
    author: UserProfile,
    recipes_limit: Option<i64>,
) -> AppResult<Subscription> {
    let recipes =
        RecipeRepo::list_summaries_by_author(&state.pool, author.id, recipes_limit).await?;
    let recipes_count = RecipeRepo::count_by_author(&state.pool, author.id).await?;
    Ok(Subscription {
        author,
        recipes,
        recipes_count,
    })
}
