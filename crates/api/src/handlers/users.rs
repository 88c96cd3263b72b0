//! Handlers for the `/users` resource: registration, profiles, password and
//! avatar management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use foodgram_core::account::{check_password, check_registration, Registration};
use foodgram_core::error::CoreError;
use foodgram_core::pagination::Page;
use foodgram_core::roles::ROLE_USER;
use foodgram_core::types::DbId;
use foodgram_core::validation::FieldErrors;
use foodgram_db::models::user::{CreateUser, UserProfile};
use foodgram_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::ListQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AvatarBody {
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
///
/// Register a new account. All field problems are reported at once.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<Registration>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    let input = input.normalized();
    let mut errors = check_registration(&input);

    if !input.email.is_empty()
        && UserRepo::find_by_email(&state.pool, &input.email)
            .await?
            .is_some()
    {
        errors.add("email", "A user with this email already exists");
    }
    if !input.username.is_empty()
        && UserRepo::find_by_username(&state.pool, &input.username)
            .await?
            .is_some()
    {
        errors.add("username", "A user with this username already exists");
    }
    errors.into_result()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    query: ListQuery,
) -> AppResult<Json<Page<UserProfile>>> {
    let page = query.page_request();
    let count = UserRepo::count(&state.pool).await?;
    let users =
        UserRepo::list_profiles(&state.pool, viewer.user_id(), page.limit, page.offset()).await?;
    Ok(Json(query.page_of(page, count, users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserProfile>> {
    let profile = UserRepo::find_profile(&state.pool, id, viewer.user_id())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(profile))
}

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserProfile>> {
    let profile = UserRepo::find_profile(&state.pool, auth.user_id, Some(auth.user_id))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(profile))
}

/// POST /api/users/set_password
///
/// Change the caller's password. Returns 204 No Content.
pub async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let mut errors = FieldErrors::new();
    let current_ok = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        errors.add("current_password", "Current password is incorrect");
    }
    if let Some(message) = check_password(&input.new_password) {
        errors.add("new_password", message);
    }
    errors.into_result()?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/users/me/avatar
pub async fn put_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<AvatarBody>,
) -> AppResult<Json<AvatarBody>> {
    let avatar = input
        .avatar
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    let Some(avatar) = avatar else {
        let mut errors = FieldErrors::new();
        errors.add("avatar", "This field is required");
        return Err(CoreError::InvalidFields(errors).into());
    };

    UserRepo::set_avatar(&state.pool, auth.user_id, Some(&avatar)).await?;
    Ok(Json(AvatarBody {
        avatar: Some(avatar),
    }))
}

/// DELETE /api/users/me/avatar
pub async fn delete_avatar(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    UserRepo::set_avatar(&state.pool, auth.user_id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}
