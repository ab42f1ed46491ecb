use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use super::model::{
    CreateFeatureDto, FeatureData, FeatureListData, FeatureListParams, FeatureStatsData,
    UpdateFeatureDto,
};
use super::service::FeatureService;
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ResourceId;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

/// Public feature list with filtering, search, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/features",
    params(
        ("status" = Option<String>, Query, description = "Filter by status, 'all' for no filter"),
        ("priority" = Option<String>, Query, description = "Filter by priority, 'all' for no filter"),
        ("search" = Option<String>, Query, description = "Case-insensitive search over name, description, and tags"),
        ("sortBy" = Option<String>, Query, description = "createdAt | updatedAt | name | status | priority"),
        ("sortOrder" = Option<String>, Query, description = "asc | desc"),
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<i64>, Query, description = "Page size, clamped to 1..=100")
    ),
    responses(
        (status = 200, description = "Feature page", body = ApiResponse<FeatureListData>)
    ),
    tag = "Features"
)]
#[instrument(skip(state, _caller, params))]
pub async fn list_features(
    State(state): State<AppState>,
    // Identity is optional here; the list is public either way.
    MaybeAuthUser(_caller): MaybeAuthUser,
    Query(params): Query<FeatureListParams>,
) -> Result<Json<ApiResponse<FeatureListData>>, AppError> {
    let (features, pagination) = FeatureService::list(&state.db, &params).await?;

    Ok(Json(ApiResponse::data(FeatureListData {
        features,
        pagination,
    })))
}

/// Status and priority breakdowns
#[utoipa::path(
    get,
    path = "/api/features/stats",
    responses(
        (status = 200, description = "Feature counts", body = ApiResponse<FeatureStatsData>)
    ),
    tag = "Features"
)]
#[instrument(skip(state))]
pub async fn get_feature_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FeatureStatsData>>, AppError> {
    let stats = FeatureService::stats(&state.db).await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// Single feature with its attachments
#[utoipa::path(
    get,
    path = "/api/features/{feature_id}",
    params(("feature_id" = String, Path, description = "Feature id")),
    responses(
        (status = 200, description = "Feature", body = ApiResponse<FeatureData>),
        (status = 404, description = "Unknown or malformed id")
    ),
    tag = "Features"
)]
#[instrument(skip(state))]
pub async fn get_feature(
    State(state): State<AppState>,
    ResourceId(feature_id): ResourceId,
) -> Result<Json<ApiResponse<FeatureData>>, AppError> {
    let feature = FeatureService::get_feature(&state.db, feature_id).await?;
    Ok(Json(ApiResponse::data(FeatureData { feature })))
}

/// Create a feature
#[utoipa::path(
    post,
    path = "/api/features",
    request_body = CreateFeatureDto,
    responses(
        (status = 201, description = "Feature created", body = ApiResponse<FeatureData>),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, actor, dto))]
pub async fn create_feature(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateFeatureDto>,
) -> Result<(StatusCode, Json<ApiResponse<FeatureData>>), AppError> {
    let feature = FeatureService::create_feature(&state.db, dto, &actor.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Feature created successfully",
            FeatureData { feature },
        )),
    ))
}

/// Partially update a feature
#[utoipa::path(
    put,
    path = "/api/features/{feature_id}",
    params(("feature_id" = String, Path, description = "Feature id")),
    request_body = UpdateFeatureDto,
    responses(
        (status = 200, description = "Feature updated", body = ApiResponse<FeatureData>),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Unknown or malformed id")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _actor, dto))]
pub async fn update_feature(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
    ResourceId(feature_id): ResourceId,
    ValidatedJson(dto): ValidatedJson<UpdateFeatureDto>,
) -> Result<Json<ApiResponse<FeatureData>>, AppError> {
    let feature = FeatureService::update_feature(&state.db, feature_id, dto).await?;

    Ok(Json(ApiResponse::with_message(
        "Feature updated successfully",
        FeatureData { feature },
    )))
}

/// Delete a feature and its attachments
#[utoipa::path(
    delete,
    path = "/api/features/{feature_id}",
    params(("feature_id" = String, Path, description = "Feature id")),
    responses(
        (status = 200, description = "Feature deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Unknown or malformed id")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _actor))]
pub async fn delete_feature(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
    ResourceId(feature_id): ResourceId,
) -> Result<Json<ApiResponse<()>>, AppError> {
    FeatureService::delete_feature(&state.db, &state.storage, feature_id).await?;
    Ok(Json(ApiResponse::message("Feature deleted successfully")))
}
