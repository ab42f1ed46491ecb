//! Role gate extractors, composed on [`AuthUser`].
//!
//! A missing or invalid identity fails with 401 inside `AuthUser`; an
//! authenticated identity below the required role fails here with 403.
//! Self-reference rules (no self-disable, self-delete, self-demote) are
//! enforced in the users service, not in the gate.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{User, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Admits admins and superadmins. Carries the acting user.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        check_min_role(&user, UserRole::Admin)?;
        Ok(RequireAdmin(user))
    }
}

/// Admits superadmins only. Carries the acting user.
#[derive(Debug, Clone)]
pub struct RequireSuperadmin(pub User);

impl FromRequestParts<AppState> for RequireSuperadmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        check_min_role(&user, UserRole::Superadmin)?;
        Ok(RequireSuperadmin(user))
    }
}

/// Pure predicate behind both gates.
pub fn check_min_role(user: &User, minimum: UserRole) -> Result<(), AppError> {
    if user.role < minimum {
        return Err(AppError::forbidden(match minimum {
            UserRole::Superadmin => "Access denied. Super admin privileges required.",
            _ => "Access denied. Admin privileges required.",
        }));
    }
    Ok(())
}
