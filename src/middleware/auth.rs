//! Authentication extractors.
//!
//! [`AuthUser`] is the request identity: it validates the bearer token,
//! reloads the referenced account from the database, and rejects disabled or
//! vanished accounts. Role checks live in [`crate::middleware::role`] on top
//! of this.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor providing the authenticated, sanitized user.
///
/// The role is taken from the freshly loaded record, not from the token's
/// convenience claim, so role changes apply to tokens already in the wild.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<User, AppError> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized("Access denied. No token provided or invalid format.")
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Access denied. No token provided or invalid format.")
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        let user = UserService::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid token or user not active."))?;

        if !user.enabled {
            return Err(AppError::unauthorized("Invalid token or user not active."));
        }

        Ok(user)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::authenticate(parts, state).await.map(AuthUser)
    }
}

/// Optional-authentication variant for public endpoints that adapt to a
/// signed-in caller. Any failure in the pipeline yields `None` instead of a
/// rejection.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            AuthUser::authenticate(parts, state).await.ok(),
        ))
    }
}
