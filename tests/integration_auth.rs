mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, generate_unique_email, json_request, login_token, setup_test_app,
};
use featureboard::modules::users::model::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", UserRole::Admin, true).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "testpass123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["email"], email);
    assert_eq!(body["data"]["user"]["role"], "admin");
    // Successful login stamps lastLogin
    assert!(body["data"]["user"]["lastLogin"].is_string());
    assert!(body["data"]["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@test.com", "password": "whatever123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password_leaves_last_login_untouched(pool: PgPool) {
    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "correctpass", UserRole::Admin, true).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "wrongpassword" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");

    let (last_login,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT last_login FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_disabled_account(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", UserRole::Admin, false).await;

    let app = setup_test_app(pool).await;

    // Correct password, still rejected
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "testpass123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Account is disabled. Please contact administrator."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_validation_failure(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "not-an-email", "password": "123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_round_trip(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", UserRole::User, true).await;

    let app = setup_test_app(pool).await;
    let token = login_token(&app, &email, "testpass123").await;

    let response = app
        .oneshot(json_request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["email"], email);
    assert_eq!(body["data"]["user"]["role"], "user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_token(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(json_request("GET", "/api/auth/me", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_token(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", UserRole::Admin, true).await;

    let app = setup_test_app(pool).await;
    let token = login_token(&app, &email, "testpass123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-token",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token is valid");
    assert_eq!(body["data"]["user"]["email"], email);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-token",
            Some("garbage-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_for_deleted_user_rejected(pool: PgPool) {
    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "testpass123", UserRole::Admin, true).await;

    let app = setup_test_app(pool.clone()).await;
    let token = login_token(&app, &email, "testpass123").await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "oldpassword", UserRole::Admin, true).await;

    let app = setup_test_app(pool).await;
    let token = login_token(&app, &email, "oldpassword").await;

    // Wrong current password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({ "currentPassword": "not-it", "newPassword": "newpassword1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Current password is incorrect");

    // Correct current password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({ "currentPassword": "oldpassword", "newPassword": "newpassword1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works, new one does
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "oldpassword" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    login_token(&app, &email, "newpassword1").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_acknowledged(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", UserRole::User, true).await;

    let app = setup_test_app(pool).await;
    let token = login_token(&app, &email, "testpass123").await;

    let response = app
        .oneshot(json_request("POST", "/api/auth/logout", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Logged out successfully");
}
