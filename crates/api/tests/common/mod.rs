#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use playora_backend::memory::{InMemoryAuth, InMemoryBackend};
use playora_backend::{AuthProvider, BackendConfig, Credentials};
use playora_core::category::Category;
use playora_core::game::Game;
use playora_core::status::GameStatus;
use tower::ServiceExt;

use playora_api::auth::jwt::JwtConfig;
use playora_api::config::ServerConfig;
use playora_api::router::build_app_router;
use playora_api::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";
pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a 1 MiB upload cap.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        catalog_cache_secs: 60,
        backend: BackendConfig::new("http://backend.test", "anon-key"),
        jwt: None,
    }
}

/// A router wired to an in-memory backend, plus handles to that backend so
/// tests can seed records and simulate outages.
pub struct TestApp {
    pub app: Router,
    pub memory: InMemoryBackend,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Sign the admin in directly against the backend and return the token.
    pub async fn admin_token(&self) -> String {
        self.memory
            .auth
            .sign_in(&Credentials {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
            })
            .await
            .expect("admin sign-in should succeed")
            .access_token
    }
}

/// Build the full application router with all middleware layers over a
/// fresh in-memory backend holding one admin account.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Same as [`build_test_app`] but with local JWT verification enabled.
pub fn build_test_app_with_jwt() -> TestApp {
    let mut config = test_config();
    config.jwt = Some(JwtConfig {
        secret: JWT_SECRET.to_string(),
    });
    build_test_app_with(config)
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let memory =
        InMemoryBackend::new(InMemoryAuth::new().with_user(ADMIN_EMAIL, ADMIN_PASSWORD));
    let state = AppState {
        backend: memory.backend(),
        config: Arc::new(config.clone()),
    };
    TestApp {
        app: build_app_router(state, &config),
        memory,
    }
}

/// A game record `age_mins` minutes old.
pub fn game(id: &str, title: &str, category: Category, status: GameStatus, age_mins: i64) -> Game {
    Game {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        category,
        thumbnail_url: Some(format!("http://backend.test/storage/v1/object/public/thumbnails/{id}.png")),
        game_url: format!("https://games.example.com/{id}/index.html"),
        developer_email: Some("dev@example.com".to_string()),
        status,
        created_at: Utc::now() - Duration::minutes(age_mins),
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    let (content_type, body) = form.finish();
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----playora-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

/// Bytes that sniff as a PNG image.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0, 0, 1, 0, 0, 0, 1]);
    bytes
}

/// A complete, valid submission form.
pub fn valid_submission() -> MultipartForm {
    MultipartForm::new()
        .text("title", "Super Dash")
        .text("description", "Run, jump, dash.")
        .text("category", "action")
        .text("gameUrl", "https://games.example.com/super-dash/index.html")
        .text("developerEmail", "dev@example.com")
}
