use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::middleware::role::RequireSuperadmin;
use crate::modules::users::model::{
    CreateUserDto, ToggleUserDto, UpdateUserDto, UserData, UsersData,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ResourceId;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

/// List all user accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<UsersData>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
    RequireSuperadmin(_actor): RequireSuperadmin,
) -> Result<Json<ApiResponse<UsersData>>, AppError> {
    let users = UserService::get_all_users(&state.db).await?;
    let total_users = users.len() as i64;

    Ok(Json(ApiResponse::data(UsersData { users, total_users })))
}

/// Get a single user
#[utoipa::path(
    get,
    path = "/api/admin/users/{userId}",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserData>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    RequireSuperadmin(_actor): RequireSuperadmin,
    ResourceId(user_id): ResourceId,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user = UserService::get_user_by_id(&state.db, user_id).await?;
    Ok(Json(ApiResponse::data(UserData { user })))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserData>),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireSuperadmin(_actor): RequireSuperadmin,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserData>>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User created successfully",
            UserData { user },
        )),
    ))
}

/// Update a user account
#[utoipa::path(
    put,
    path = "/api/admin/users/{userId}",
    params(("userId" = String, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserData>),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only, or self role change"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireSuperadmin(actor): RequireSuperadmin,
    ResourceId(user_id): ResourceId,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user = UserService::update_user(&state.db, user_id, dto, actor.id).await?;

    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        UserData { user },
    )))
}

/// Enable or disable a user account
#[utoipa::path(
    patch,
    path = "/api/admin/users/{userId}/toggle",
    params(("userId" = String, Path, description = "User ID")),
    request_body = ToggleUserDto,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<UserData>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only, or own account"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn toggle_user_status(
    State(state): State<AppState>,
    RequireSuperadmin(actor): RequireSuperadmin,
    ResourceId(user_id): ResourceId,
    ValidatedJson(dto): ValidatedJson<ToggleUserDto>,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user = UserService::toggle_enabled(&state.db, user_id, dto.enabled, actor.id).await?;

    let message = if dto.enabled {
        "User enabled successfully"
    } else {
        "User disabled successfully"
    };

    Ok(Json(ApiResponse::with_message(message, UserData { user })))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/api/admin/users/{userId}",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only, or own account"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireSuperadmin(actor): RequireSuperadmin,
    ResourceId(user_id): ResourceId,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::delete_user(&state.db, user_id, actor.id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}
