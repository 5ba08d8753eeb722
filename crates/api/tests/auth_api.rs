//! HTTP-level integration tests for sign-in, sign-out, and session checks.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_jwt, get, get_auth, post_auth, post_json,
    ADMIN_EMAIL, ADMIN_PASSWORD, JWT_SECRET,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use playora_api::auth::jwt::{Claims, SESSION_AUDIENCE};
use serde_json::json;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

fn signed_token(aud: &str, exp_offset_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "reviewer-1".to_string(),
        email: Some(ADMIN_EMAIL.to_string()),
        aud: aud.to_string(),
        exp: now + exp_offset_secs,
        iat: Some(now),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Sign-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_success_returns_session() {
    let app = build_test_app();
    let response = login(app.router(), ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn login_failure_surfaces_backend_message() {
    let app = build_test_app();
    let response = login(app.router(), ADMIN_EMAIL, "wrong").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid login credentials");
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_token_opens_admin_dashboard() {
    let app = build_test_app();
    let json = body_json(login(app.router(), ADMIN_EMAIL, ADMIN_PASSWORD).await).await;
    let token = json["access_token"].as_str().unwrap();

    let response = get_auth(app.router(), "/api/v1/admin/games", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_reports_current_user() {
    let app = build_test_app();
    let token = app.admin_token().await;

    let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn session_without_token_is_unauthorized() {
    let app = build_test_app();
    let response = get(app.router(), "/api/v1/auth/session").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing Authorization header");
}

// ---------------------------------------------------------------------------
// Sign-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_ends_session() {
    let app = build_test_app();
    let token = app.admin_token().await;

    let response = post_auth(app.router(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.memory.auth.active_sessions().await, 0);

    let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_backend_failure_is_502() {
    let app = build_test_app();
    let token = app.admin_token().await;
    app.memory.auth.set_fail_sign_out(true);

    let response = post_auth(app.router(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to sign out");
}

// ---------------------------------------------------------------------------
// Local JWT verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn local_jwt_accepts_signed_session_token() {
    let app = build_test_app_with_jwt();
    let token = signed_token(SESSION_AUDIENCE, 3600);

    let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "reviewer-1");
}

#[tokio::test]
async fn local_jwt_rejects_expired_or_anon_tokens() {
    let app = build_test_app_with_jwt();

    for token in [signed_token(SESSION_AUDIENCE, -300), signed_token("anon", 3600)] {
        let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
