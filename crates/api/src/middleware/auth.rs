//! Authentication extractors.
//!
//! Bearer tokens are decoded against the configured secret, then the user
//! is loaded fresh from the database so role changes and deactivation take
//! effect immediately, not at token expiry.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use nabta_core::UserId;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::services::auth;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.phone)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires a valid bearer token for an `ADMIN` user.
pub struct RequireAdmin(pub User);

/// Extractor that resolves the current user when a token is present,
/// without rejecting anonymous requests.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = token_user_id(parts, state)?;
        let user = load_active_user(state, user_id).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden("admin access required".to_string()));
        }
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(user_id) = token_user_id(parts, state) else {
            return Ok(Self(None));
        };

        match load_active_user(state, user_id).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(_) => Ok(Self(None)),
        }
    }
}

/// Pull the bearer token off the request and decode it.
fn token_user_id(parts: &Parts, state: &AppState) -> Result<UserId, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    Ok(auth::decode_token(token, &state.config().jwt_secret)?)
}

/// Load the token's user, rejecting missing or deactivated accounts.
async fn load_active_user(state: &AppState, user_id: UserId) -> Result<User, AppError> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("account is disabled".to_string()));
    }

    Ok(user)
}
