mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, generate_unique_email, json_request, login_token, setup_test_app,
};
use featureboard::modules::users::model::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn superadmin_token(pool: &PgPool, app: &axum::Router) -> String {
    let email = generate_unique_email();
    create_test_user(pool, &email, "superpass123", UserRole::Superadmin, true).await;
    login_token(app, &email, "superpass123").await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_users_requires_superadmin(pool: PgPool) {
    let admin_email = generate_unique_email();
    create_test_user(&pool, &admin_email, "adminpass123", UserRole::Admin, true).await;

    let app = setup_test_app(pool.clone()).await;

    // No token
    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/admin/users", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin is not enough
    let admin_token = login_token(&app, &admin_email, "adminpass123").await;
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/admin/users",
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Superadmin sees the list
    let token = superadmin_token(&pool, &app).await;
    let response = app
        .oneshot(json_request("GET", "/api/admin/users", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalUsers"], 2);
    assert_eq!(body["data"]["users"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_user_defaults_and_duplicates(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;

    let email = generate_unique_email();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&token),
            Some(json!({ "name": "New Admin", "email": email, "password": "secret123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User created successfully");
    // Role defaults to admin, accounts start enabled
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert_eq!(body["data"]["user"]["enabled"], true);

    // Same email again
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&token),
            Some(json!({ "name": "New Admin", "email": email, "password": "secret123" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User with this email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user_by_id(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = superadmin_token(&pool, &app).await;

    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "secret123", UserRole::User, true).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/admin/users/{}", user_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["email"], email);

    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/admin/users/{}", Uuid::new_v4()),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_user_and_self_demotion(pool: PgPool) {
    let super_email = generate_unique_email();
    let super_id =
        create_test_user(&pool, &super_email, "superpass123", UserRole::Superadmin, true).await;

    let app = setup_test_app(pool.clone()).await;
    let token = login_token(&app, &super_email, "superpass123").await;

    // Changing someone else's role is fine
    let other_id = create_test_user(
        &pool,
        &generate_unique_email(),
        "secret123",
        UserRole::User,
        true,
    )
    .await;
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/users/{}", other_id),
            Some(&token),
            Some(json!({ "role": "admin" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["role"], "admin");

    // Changing your own role is not
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/users/{}", super_id),
            Some(&token),
            Some(json!({ "role": "admin" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Cannot change your own role");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_toggle_user(pool: PgPool) {
    let super_email = generate_unique_email();
    let super_id =
        create_test_user(&pool, &super_email, "superpass123", UserRole::Superadmin, true).await;

    let app = setup_test_app(pool.clone()).await;
    let token = login_token(&app, &super_email, "superpass123").await;

    let target_email = generate_unique_email();
    let target_id = create_test_user(&pool, &target_email, "secret123", UserRole::Admin, true).await;

    // Disable someone else
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/admin/users/{}/toggle", target_id),
            Some(&token),
            Some(json!({ "enabled": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["enabled"], false);

    // The disabled account can no longer log in
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": target_email, "password": "secret123" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Self-toggle is rejected even when enabling
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/admin/users/{}/toggle", super_id),
            Some(&token),
            Some(json!({ "enabled": true })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Cannot disable your own account");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_user(pool: PgPool) {
    let super_email = generate_unique_email();
    let super_id =
        create_test_user(&pool, &super_email, "superpass123", UserRole::Superadmin, true).await;

    let app = setup_test_app(pool.clone()).await;
    let token = login_token(&app, &super_email, "superpass123").await;

    let target_id = create_test_user(
        &pool,
        &generate_unique_email(),
        "secret123",
        UserRole::User,
        true,
    )
    .await;

    // Self-delete is rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/admin/users/{}", super_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Deleting someone else works and the record is gone
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/admin/users/{}", target_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/admin/users/{}", target_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
