use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

mod support;

use support::{TestApp, OWNER_EMAIL, OWNER_PASSWORD};

#[tokio::test]
async fn owner_login_returns_bearer_token_and_profile() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_json(
            "/api/auth/login",
            None,
            json!({ "email": "Owner@Example.com", "password": OWNER_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 86_400);
    assert_eq!(body["user"]["email"], OWNER_EMAIL);
    assert_eq!(body["user"]["role"], "owner");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email_alike() {
    let app = TestApp::new().await;
    let (wrong_status, wrong_body) = app
        .post_json(
            "/api/auth/login",
            None,
            json!({ "email": OWNER_EMAIL, "password": "not-the-password" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post_json(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "whatever" }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"], unknown_body["error"]);
}

#[tokio::test]
async fn login_validates_email_shape() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_json(
            "/api/auth/login",
            None,
            json!({ "email": "owner", "password": "x" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn me_requires_a_valid_bearer_token() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.owner_token().await;
    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "owner");
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let (status, _) = app
        .put_json(
            "/api/auth/change-password",
            Some(&token),
            json!({ "current_password": "wrong", "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .put_json(
            "/api/auth/change-password",
            Some(&token),
            json!({ "current_password": OWNER_PASSWORD, "new_password": OWNER_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put_json(
            "/api/auth/change-password",
            Some(&token),
            json!({ "current_password": OWNER_PASSWORD, "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    app.login(OWNER_EMAIL, "brand-new-pass").await;
}

#[tokio::test]
async fn bearer_token_expires_after_24_hours_of_app_time() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    app.clock.advance(Duration::hours(24) - Duration::seconds(1));
    let (status, _) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::seconds(2));
    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}
