use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, post},
};

use super::controller::{delete_attachment, upload_attachments};
use crate::config::storage::StorageConfig;
use crate::state::AppState;

pub fn init_upload_router(storage_config: &StorageConfig) -> Router<AppState> {
    // Body limit covers a full batch plus multipart framing overhead; the
    // per-file limit is enforced again in the upload service.
    let body_limit =
        storage_config.max_file_size * storage_config.max_files_per_upload + 1024 * 1024;

    Router::new()
        .route("/feature/{feature_id}/attachments", post(upload_attachments))
        .route(
            "/feature/{feature_id}/attachments/{attachment_id}",
            delete(delete_attachment),
        )
        .layer(DefaultBodyLimit::max(body_limit))
}
