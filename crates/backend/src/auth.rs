//! Reviewer sessions: the [`AuthProvider`] seam and its GoTrue implementation.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{api_message, BackendError};
use crate::http::RestClient;

/// Email/password pair submitted on the login page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The user a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An established reviewer session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

/// Session management for reviewers.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange credentials for a session. Refused credentials yield
    /// [`BackendError::Rejected`] carrying the backend's message.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError>;

    /// End the session identified by `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Resolve the user behind `access_token`. `Ok(None)` means the token is
    /// not (or no longer) a valid session.
    async fn get_user(&self, access_token: &str) -> Result<Option<SessionUser>, BackendError>;
}

/// [`AuthProvider`] over the GoTrue endpoint of a Supabase project.
pub struct SupabaseAuth {
    rest: RestClient,
}

impl SupabaseAuth {
    pub(crate) fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let response = self
            .rest
            .request(Method::POST, "/auth/v1/token", None)
            .query(&[("grant_type", "password")])
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected(api_message(&body)));
        }
        RestClient::parse_response(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .rest
            .request(Method::POST, "/auth/v1/logout", Some(access_token))
            .send()
            .await?;
        RestClient::ensure_success(response).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<SessionUser>, BackendError> {
        let response = self
            .rest
            .request(Method::GET, "/auth/v1/user", Some(access_token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => RestClient::parse_response(response).await.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_password_grant_response() {
        let body = serde_json::json!({
            "access_token": "eyJ...",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_790_000_000,
            "refresh_token": "r-123",
            "user": {
                "id": "5b0c7f0e-0000-4000-8000-000000000001",
                "aud": "authenticated",
                "email": "admin@example.com",
                "role": "authenticated"
            }
        });
        let session: Session = serde_json::from_value(body).unwrap();
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn user_without_email_decodes() {
        let user: SessionUser =
            serde_json::from_value(serde_json::json!({ "id": "u1" })).unwrap();
        assert!(user.email.is_none());
    }
}
