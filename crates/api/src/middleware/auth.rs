//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use playora_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Signed-in reviewer extracted from a Bearer token in the `Authorization`
/// header.
///
/// When a JWT secret is configured the token is verified locally; otherwise
/// the backend is asked who the token belongs to. Use this as an extractor
/// parameter in any handler that requires a session:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The backend user id.
    pub user_id: String,
    /// The user's email, when known.
    pub email: Option<String>,
    /// The raw access token, forwarded to the backend on the user's behalf.
    pub access_token: String,
}

/// The raw Bearer token from the `Authorization` header, not yet verified.
///
/// For handlers that hand the token to the backend and let it decide, such
/// as the admin list which checks the session and reads records in one go.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        Ok(BearerToken(token.to_string()))
    }
}

/// Rejection for a token that is present but not a live session.
pub fn invalid_session() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        if let Some(jwt) = &state.config.jwt {
            let claims = validate_token(&token, jwt).map_err(|_| invalid_session())?;
            return Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                access_token: token,
            });
        }

        let user = state
            .backend
            .auth
            .get_user(&token)
            .await
            .map_err(AppError::backend("Failed to verify session"))?
            .ok_or_else(invalid_session)?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            access_token: token,
        })
    }
}
