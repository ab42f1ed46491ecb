use axum::{Json, extract::State};
use tracing::instrument;

use super::model::{ChangePasswordRequest, LoginData, LoginRequest};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserData;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginData>),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Invalid credentials or disabled account")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, AppError> {
    let data = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(ApiResponse::with_message("Login successful", data)))
}

/// Current caller's identity
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller identity", body = ApiResponse<UserData>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_current_user(
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    Ok(Json(ApiResponse::data(UserData { user })))
}

/// Acknowledge logout
///
/// There is no server-side revocation list; the token stays valid until it
/// expires and the client simply discards it.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn logout(AuthUser(_user): AuthUser) -> Result<Json<ApiResponse<()>>, AppError> {
    Ok(Json(ApiResponse::message("Logged out successfully")))
}

/// Check a token and return its identity
#[utoipa::path(
    post,
    path = "/api/auth/verify-token",
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<UserData>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn verify_token(
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    Ok(Json(ApiResponse::with_message(
        "Token is valid",
        UserData { user },
    )))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized or wrong current password")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    AuthService::change_password(&state.db, user.id, &dto.current_password, &dto.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password changed successfully")))
}
