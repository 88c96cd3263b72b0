//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use foodgram_core::error::CoreError;
use foodgram_core::roles::ROLE_ADMIN;
use foodgram_core::types::DbId;
use foodgram_db::repositories::RevokedTokenRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization` header.
///
/// Accepts both `Bearer <token>` and `Token <token>`. Tokens revoked by
/// logout are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name.
    pub role: String,
    /// Token id, recorded on logout.
    pub jti: String,
    /// Token expiry (UTC Unix timestamp).
    pub expires_at: i64,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| unauthorized("Authentication credentials were not provided"))?;
        authenticate(header.to_str().ok(), state).await
    }
}

/// Optional authentication for public endpoints.
///
/// Anonymous requests yield `MaybeAuthUser(None)`. A request that does send
/// credentials must send valid ones; bad tokens are still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get(AUTHORIZATION) {
            None => Ok(Self(None)),
            Some(header) => authenticate(header.to_str().ok(), state)
                .await
                .map(|user| Self(Some(user))),
        }
    }
}

async fn authenticate(header: Option<&str>, state: &AppState) -> Result<AuthUser, AppError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("Token ")))
        .map(str::trim)
        .ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    if RevokedTokenRepo::is_revoked(&state.pool, &claims.jti).await? {
        return Err(unauthorized("Token has been revoked"));
    }

    Ok(AuthUser {
        user_id: claims.sub,
        role: claims.role,
        jti: claims.jti,
        expires_at: claims.exp,
    })
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
