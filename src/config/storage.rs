use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory attachment blobs are written to.
    pub upload_dir: PathBuf,
    /// Public URL prefix the stored keys are served under.
    pub base_url: String,
    /// Per-file size cap in bytes.
    pub max_file_size: usize,
    /// Maximum number of files per upload request.
    pub max_files_per_upload: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "storage/uploads".to_string()),
            ),
            base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            max_file_size: env::var("UPLOAD_MAX_FILE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024), // 10MB
            max_files_per_upload: env::var("UPLOAD_MAX_FILES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        }
    }
}
