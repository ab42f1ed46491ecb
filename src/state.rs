use std::sync::Arc;

use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::storage::StorageConfig;
use crate::utils::file_storage::{FileStorage, LocalFileStorage};

/// Shared application state, constructed once at startup and cloned into
/// every handler. Nothing here is a process-global; the pool is closed
/// explicitly on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub storage: Arc<dyn FileStorage>,
}

pub async fn init_app_state() -> AppState {
    let storage_config = StorageConfig::from_env();
    let storage = Arc::new(LocalFileStorage::new(
        storage_config.upload_dir.clone(),
        storage_config.base_url.clone(),
        storage_config.max_file_size,
    ));

    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        storage_config,
        storage,
    }
}
