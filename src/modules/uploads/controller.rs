use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;

use super::model::{IncomingFile, UploadData};
use super::service::UploadService;
use crate::middleware::role::RequireAdmin;
use crate::modules::features::service::FeatureService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ResourceId, parse_resource_id};
use crate::utils::response::ApiResponse;

/// Upload attachments to a feature
///
/// Multipart field name is `attachments`. The body is drained completely
/// before any file is written so a rejected batch persists nothing.
#[utoipa::path(
    post,
    path = "/api/upload/feature/{feature_id}/attachments",
    params(("feature_id" = String, Path, description = "Feature id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files uploaded", body = ApiResponse<UploadData>),
        (status = 400, description = "No files, too many files, or a file too large"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Unknown feature")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _actor, multipart))]
pub async fn upload_attachments(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
    ResourceId(feature_id): ResourceId,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadData>>), AppError> {
    // 404 before reading the body when the feature does not exist.
    FeatureService::get_row(&state.db, feature_id).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart body"))?
    {
        if field.name() != Some("attachments") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "unnamed".to_string());
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Invalid multipart body"))?
            .to_vec();

        files.push(IncomingFile {
            file_name,
            content_type,
            data,
        });
    }

    let uploaded_files = UploadService::save_attachments(
        &state.db,
        &state.storage,
        &state.storage_config,
        feature_id,
        files,
    )
    .await?;

    let feature = FeatureService::get_feature(&state.db, feature_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Files uploaded successfully",
            UploadData {
                uploaded_files,
                feature,
            },
        )),
    ))
}

/// Delete one attachment from a feature
#[utoipa::path(
    delete,
    path = "/api/upload/feature/{feature_id}/attachments/{attachment_id}",
    params(
        ("feature_id" = String, Path, description = "Feature id"),
        ("attachment_id" = String, Path, description = "Attachment id")
    ),
    responses(
        (status = 200, description = "Attachment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Unknown feature or attachment")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _actor))]
pub async fn delete_attachment(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
    Path((raw_feature_id, raw_attachment_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let feature_id = parse_resource_id(&raw_feature_id)?;
    let attachment_id = parse_resource_id(&raw_attachment_id)?;

    FeatureService::get_row(&state.db, feature_id).await?;
    UploadService::delete_attachment(&state.db, &state.storage, feature_id, attachment_id).await?;

    Ok(Json(ApiResponse::message("Attachment deleted successfully")))
}
