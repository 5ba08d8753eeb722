//! Handlers for the `/auth` resource (login, logout, session).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use playora_backend::{BackendError, Credentials};
use playora_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and returned by
/// `GET /auth/session`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Sign in with email + password. A refusal carries the backend's message
/// unchanged.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let credentials = Credentials {
        email: input.email,
        password: input.password,
    };

    let session = state
        .backend
        .auth
        .sign_in(&credentials)
        .await
        .map_err(|e| match e {
            BackendError::Rejected(msg) => AppError::Core(CoreError::Unauthorized(msg)),
            other => AppError::backend("Failed to sign in")(other),
        })?;

    tracing::info!(user_id = %session.user.id, "Reviewer signed in");

    Ok(Json(AuthResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
        user: UserInfo {
            id: session.user.id,
            email: session.user.email,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// End the caller's backend session.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    state
        .backend
        .auth
        .sign_out(&auth.access_token)
        .await
        .map_err(AppError::backend("Failed to sign out"))?;

    tracing::info!(user_id = %auth.user_id, "Reviewer signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn session(auth: AuthUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse {
        data: UserInfo {
            id: auth.user_id,
            email: auth.email,
        },
    })
}
