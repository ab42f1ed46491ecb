//! PostgreSQL connection pool initialization.
//!
//! Reads `DATABASE_URL` and builds the SQLx pool once at startup; the pool
//! is cheaply cloneable and lives in [`crate::state::AppState`] until the
//! shutdown signal closes it.

use sqlx::PgPool;
use std::env;

/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable.
/// Both are startup-fatal conditions.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
