use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use featureboard::config::cors::CorsConfig;
use featureboard::config::jwt::JwtConfig;
use featureboard::config::storage::StorageConfig;
use featureboard::modules::users::model::UserRole;
use featureboard::router::init_router;
use featureboard::state::AppState;
use featureboard::utils::file_storage::LocalFileStorage;
use featureboard::utils::password::hash_password;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn generate_unique_email() -> String {
    format!("user-{}@test.com", Uuid::new_v4())
}

/// Build the full application router against the test pool, with attachment
/// storage pointed at a throwaway temp directory.
pub async fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();

    let storage_config = StorageConfig {
        upload_dir: std::env::temp_dir().join(format!("featureboard-test-{}", Uuid::new_v4())),
        base_url: "http://localhost:3000/files".to_string(),
        max_file_size: 10 * 1024 * 1024,
        max_files_per_upload: 5,
    };
    let storage = Arc::new(LocalFileStorage::new(
        storage_config.upload_dir.clone(),
        storage_config.base_url.clone(),
        storage_config.max_file_size,
    ));

    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        storage_config,
        storage,
    };

    init_router(state)
}

#[allow(dead_code)]
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    role: UserRole,
    enabled: bool,
) -> Uuid {
    let hashed = hash_password(password).unwrap();

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (name, email, password, role, enabled)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind("Test User")
    .bind(email)
    .bind(hashed)
    .bind(role)
    .bind(enabled)
    .fetch_one(pool)
    .await
    .unwrap();

    id
}

#[allow(dead_code)]
pub async fn create_test_feature(pool: &PgPool, name: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO features (name, description, purpose, implementation, technical_details)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(name)
    .bind("A feature seeded for integration tests")
    .bind("Exists so endpoints have something to act on")
    .bind("Inserted directly into the database")
    .bind("No technical details worth mentioning")
    .fetch_one(pool)
    .await
    .unwrap();

    id
}

/// Log in through the API and return the bearer token.
#[allow(dead_code)]
pub async fn login_token(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
