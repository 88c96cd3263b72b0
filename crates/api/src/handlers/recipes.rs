//! Handlers for the `/recipes` resource.
//!
//! Covers CRUD, the favorite / shopping-cart collection actions, the
//! shopping-list download, and short-link generation. Reads are public;
//! collection state in responses is relative to the caller, if any.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foodgram_core::collection::RecipeCollection;
use foodgram_core::document::{render, ShoppingListFormat};
use foodgram_core::error::CoreError;
use foodgram_core::pagination::Page;
use foodgram_core::recipe::{check_draft, report_unknown_ids, DraftMode, RecipeDraft};
use foodgram_core::shopping_list::{aggregate, IngredientLine};
use foodgram_core::types::{DbId, Timestamp};
use foodgram_db::models::recipe::{
    Recipe, RecipeFilter, RecipeIngredientView, RecipeInput, RecipeSummary,
};
use foodgram_db::models::tag::Tag;
use foodgram_db::models::user::UserProfile;
use foodgram_db::repositories::{
    IngredientRepo, RecipeCollectionRepo, RecipeIngredientRepo, RecipeRepo, TagRepo, UserRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::ListQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Full recipe representation.
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: DbId,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/recipes
///
/// Filters: `author=<id>`, `tags=<slug>` (repeatable, any match),
/// `is_favorited=1` and `is_in_shopping_cart=1` (authenticated callers only).
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    query: ListQuery,
) -> AppResult<Json<Page<RecipeDetail>>> {
    let page = query.page_request();
    let viewer_id = viewer.user_id();
    let signed_in = viewer_id.is_some();

    let filter = RecipeFilter {
        author_id: query.first("author").and_then(|a| a.parse().ok()),
        tag_slugs: query.all("tags"),
        favorited_only: signed_in && query.flag("is_favorited"),
        in_cart_only: signed_in && query.flag("is_in_shopping_cart"),
    };

    let count = RecipeRepo::count(&state.pool, viewer_id, &filter).await?;
    let recipes =
        RecipeRepo::list(&state.pool, viewer_id, &filter, page.limit, page.offset()).await?;
    let results = present(&state, recipes, viewer_id).await?;

    Ok(Json(query.page_of(page, count, results)))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<RecipeDetail>> {
    Ok(Json(load_detail(&state, id, viewer.user_id()).await?))
}

/// POST /api/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<RecipeDraft>,
) -> AppResult<(StatusCode, Json<RecipeDetail>)> {
    let input = validate_draft(&state, draft, DraftMode::Create).await?;
    let id = RecipeRepo::create(&state.pool, auth.user_id, &input, &state.short_codes).await?;

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe created");

    let detail = load_detail(&state, id, Some(auth.user_id)).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /api/recipes/{id}
///
/// Author or admin only. Tags and ingredients are replaced wholesale; an
/// absent image keeps the current one.
pub async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(draft): Json<RecipeDraft>,
) -> AppResult<Json<RecipeDetail>> {
    let recipe = find_recipe(&state, id, Some(auth.user_id)).await?;
    ensure_can_edit(&auth, &recipe)?;

    let input = validate_draft(&state, draft, DraftMode::Update).await?;
    if !RecipeRepo::update(&state.pool, id, &input).await? {
        return Err(not_found(id));
    }

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe updated");

    Ok(Json(load_detail(&state, id, Some(auth.user_id)).await?))
}

/// DELETE /api/recipes/{id}
///
/// Author or admin only. Returns 204 No Content.
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let recipe = find_recipe(&state, id, None).await?;
    ensure_can_edit(&auth, &recipe)?;

    if !RecipeRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/{id}/get-link
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShortLinkResponse>> {
    let recipe = find_recipe(&state, id, None).await?;
    let code = match recipe.short_code {
        Some(code) => code,
        // Rows written outside the API may lack a code; store one so the
        // link resolves.
        None => {
            let minted = state.short_codes.encode_db_id(recipe.id).ok_or_else(|| {
                AppError::InternalError(format!("Recipe {id} cannot be encoded"))
            })?;
            let stored = RecipeRepo::ensure_short_code(&state.pool, recipe.id, &minted)
                .await?
                .ok_or_else(|| not_found(id))?;
            tracing::info!(recipe_id = id, "Short code assigned");
            stored
        }
    };

    Ok(Json(ShortLinkResponse {
        short_link: state.public_url(&format!("/r/{code}")),
    }))
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// POST /api/recipes/{id}/favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<RecipeSummary>)> {
    add_to_collection(&state, &auth, id, RecipeCollection::Favorites).await
}

/// DELETE /api/recipes/{id}/favorite
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_from_collection(&state, &auth, id, RecipeCollection::Favorites).await
}

/// POST /api/recipes/{id}/shopping_cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<RecipeSummary>)> {
    add_to_collection(&state, &auth, id, RecipeCollection::ShoppingCart).await
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_from_collection(&state, &auth, id, RecipeCollection::ShoppingCart).await
}

/// GET /api/recipes/download_shopping_cart
///
/// Aggregate every ingredient line in the caller's cart and return it as an
/// attachment (`?format=docx`, the default, or `?format=txt`). An empty cart
/// yields a document stating that the list is empty.
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    query: ListQuery,
) -> AppResult<impl IntoResponse> {
    let format: ShoppingListFormat = match query.first("format") {
        Some(value) => value.parse()?,
        None => ShoppingListFormat::default(),
    };

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let lines = RecipeIngredientRepo::list_cart_lines(&state.pool, user.id).await?;
    let items = aggregate(lines.into_iter().map(IngredientLine::from));
    let document = render(&user.username, &items, format)?;

    tracing::info!(
        user_id = user.id,
        items = items.len(),
        format = ?format,
        "Shopping list rendered",
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, document.content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.file_name),
            ),
        ],
        document.bytes,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Recipe",
        id,
    })
}

async fn find_recipe(state: &AppState, id: DbId, viewer: Option<DbId>) -> AppResult<Recipe> {
    RecipeRepo::find_by_id(&state.pool, id, viewer)
        .await?
        .ok_or_else(|| not_found(id))
}

fn ensure_can_edit(auth: &AuthUser, recipe: &Recipe) -> AppResult<()> {
    if recipe.author_id == auth.user_id || auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the author can change this recipe".into(),
        )))
    }
}

async fn load_detail(state: &AppState, id: DbId, viewer: Option<DbId>) -> AppResult<RecipeDetail> {
    let recipe = find_recipe(state, id, viewer).await?;
    present(state, vec![recipe], viewer)
        .await?
        .pop()
        .ok_or_else(|| not_found(id))
}

/// Attach tags, ingredients, and author profiles to a batch of recipes,
/// preserving their order.
async fn present(
    state: &AppState,
    recipes: Vec<Recipe>,
    viewer: Option<DbId>,
) -> AppResult<Vec<RecipeDetail>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<DbId> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<DbId> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut tags: HashMap<DbId, Vec<Tag>> = HashMap::new();
    for row in TagRepo::list_for_recipes(&state.pool, &recipe_ids).await? {
        tags.entry(row.recipe_id).or_default().push(row.tag);
    }

    let mut ingredients: HashMap<DbId, Vec<RecipeIngredientView>> = HashMap::new();
    for row in RecipeIngredientRepo::list_for_recipes(&state.pool, &recipe_ids).await? {
        ingredients
            .entry(row.recipe_id)
            .or_default()
            .push(row.ingredient);
    }

    let authors: HashMap<DbId, UserProfile> =
        UserRepo::find_profiles(&state.pool, &author_ids, viewer)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                AppError::InternalError(format!("Author of recipe {} is missing", recipe.id))
            })?;
            Ok(RecipeDetail {
                id: recipe.id,
                tags: tags.remove(&recipe.id).unwrap_or_default(),
                author,
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                is_favorited: recipe.is_favorited,
                is_in_shopping_cart: recipe.is_in_shopping_cart,
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                pub_date: recipe.pub_date,
            })
        })
        .collect()
}

/// Run payload rules plus the existence checks that need the database, and
/// turn the draft into repository input.
async fn validate_draft(
    state: &AppState,
    draft: RecipeDraft,
    mode: DraftMode,
) -> AppResult<RecipeInput> {
    let mut errors = check_draft(&draft, mode);

    if !draft.tags.is_empty() {
        let found = TagRepo::find_existing_ids(&state.pool, &draft.tags).await?;
        report_unknown_ids(&mut errors, "tags", &draft.tags, &found);
    }

    let ingredient_ids: Vec<DbId> = draft.ingredients.iter().map(|i| i.id).collect();
    if !ingredient_ids.is_empty() {
        let found = IngredientRepo::find_existing_ids(&state.pool, &ingredient_ids).await?;
        report_unknown_ids(&mut errors, "ingredients", &ingredient_ids, &found);
    }

    errors.into_result()?;

    let Some(cooking_time) = draft.cooking_time else {
        return Err(CoreError::Validation("cooking_time is required".into()).into());
    };

    Ok(RecipeInput {
        name: draft.name.trim().to_string(),
        text: draft.text.trim().to_string(),
        image: draft
            .image
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty()),
        cooking_time,
        tag_ids: draft.tags,
        ingredients: draft.ingredients,
    })
}

async fn add_to_collection(
    state: &AppState,
    auth: &AuthUser,
    recipe_id: DbId,
    collection: RecipeCollection,
) -> AppResult<(StatusCode, Json<RecipeSummary>)> {
    let summary = RecipeRepo::find_summary(&state.pool, recipe_id)
        .await?
        .ok_or_else(|| not_found(recipe_id))?;

    let added = match RecipeCollectionRepo::add(&state.pool, collection, auth.user_id, recipe_id)
        .await
    {
        Ok(added) => added,
        // Deleted between the lookup and the insert.
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            return Err(not_found(recipe_id));
        }
        Err(e) => return Err(e.into()),
    };
    if !added {
        return Err(collection.already_added(recipe_id).into());
    }

    tracing::info!(
        recipe_id,
        user_id = auth.user_id,
        collection = collection.label(),
        "Recipe added to collection",
    );
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn remove_from_collection(
    state: &AppState,
    auth: &AuthUser,
    recipe_id: DbId,
    collection: RecipeCollection,
) -> AppResult<StatusCode> {
    if RecipeRepo::find_summary(&state.pool, recipe_id).await?.is_none() {
        return Err(not_found(recipe_id));
    }

    if !RecipeCollectionRepo::remove(&state.pool, collection, auth.user_id, recipe_id).await? {
        return Err(collection.not_present(recipe_id).into());
    }

    tracing::info!(
        recipe_id,
        user_id = auth.user_id,
        collection = collection.label(),
        "Recipe removed from collection",
    );
    Ok(StatusCode::NO_CONTENT)
}
