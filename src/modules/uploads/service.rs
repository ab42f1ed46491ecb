use std::sync::Arc;

use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::config::storage::StorageConfig;
use crate::modules::features::model::Attachment;
use crate::utils::errors::AppError;
use crate::utils::file_storage::FileStorage;

use super::model::IncomingFile;

/// File extension for the storage key, restricted to characters the storage
/// backend accepts. Anything else is stored without an extension.
fn safe_extension(file_name: &str) -> Option<String> {
    let ext = file_name.rsplit_once('.')?.1;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub struct UploadService;

impl UploadService {
    /// Store a batch of uploaded files for a feature.
    ///
    /// The whole batch is validated before anything is persisted: too many
    /// files or any oversized file rejects the entire request with nothing
    /// written to storage or the database.
    #[instrument(skip(db, storage, config, files), fields(count = files.len()))]
    pub async fn save_attachments(
        db: &PgPool,
        storage: &Arc<dyn FileStorage>,
        config: &StorageConfig,
        feature_id: Uuid,
        files: Vec<IncomingFile>,
    ) -> Result<Vec<Attachment>, AppError> {
        if files.is_empty() {
            return Err(AppError::bad_request("No files uploaded"));
        }
        if files.len() > config.max_files_per_upload {
            return Err(AppError::bad_request(format!(
                "Too many files. Maximum is {} files per upload.",
                config.max_files_per_upload
            )));
        }
        for file in &files {
            if file.data.len() > config.max_file_size {
                return Err(AppError::bad_request(format!(
                    "File size too large. Maximum size is {} bytes per file.",
                    config.max_file_size
                )));
            }
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let key = match safe_extension(&file.file_name) {
                Some(ext) => format!("features/{}/{}.{}", feature_id, Uuid::new_v4(), ext),
                None => format!("features/{}/{}", feature_id, Uuid::new_v4()),
            };

            storage.save(&key, &file.data).await?;
            let url = storage.get_url(&key)?;

            let attachment = sqlx::query_as::<_, Attachment>(
                "INSERT INTO feature_attachments \
                 (feature_id, file_name, file_type, file_size, url, storage_key) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING id, feature_id, file_name, file_type, file_size, url, \
                           storage_key, uploaded_at",
            )
            .bind(feature_id)
            .bind(&file.file_name)
            .bind(&file.content_type)
            .bind(file.data.len() as i64)
            .bind(&url)
            .bind(&key)
            .fetch_one(db)
            .await?;

            stored.push(attachment);
        }

        Ok(stored)
    }

    /// Remove one attachment row and its blob. The blob deletion is best
    /// effort; a storage failure is logged and the row stays gone.
    #[instrument(skip(db, storage))]
    pub async fn delete_attachment(
        db: &PgPool,
        storage: &Arc<dyn FileStorage>,
        feature_id: Uuid,
        attachment_id: Uuid,
    ) -> Result<(), AppError> {
        let attachment = sqlx::query_as::<_, Attachment>(
            "DELETE FROM feature_attachments WHERE id = $1 AND feature_id = $2 \
             RETURNING id, feature_id, file_name, file_type, file_size, url, \
                       storage_key, uploaded_at",
        )
        .bind(attachment_id)
        .bind(feature_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Attachment not found"))?;

        if let Err(e) = storage.delete(&attachment.storage_key).await {
            warn!(
                attachment_id = %attachment_id,
                storage_key = %attachment.storage_key,
                error = %e,
                "failed to delete attachment blob"
            );
        }

        Ok(())
    }
}
