//! Shared HTTP plumbing for the Supabase services.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};

use crate::config::BackendConfig;
use crate::error::{api_message, BackendError};

/// A configured [`reqwest::Client`] bound to one project URL and API key.
#[derive(Clone)]
pub(crate) struct RestClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl RestClient {
    pub(crate) fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request to `path` (relative to the project URL).
    ///
    /// Every request carries the `apikey` header. The bearer token is the
    /// caller's session token when there is one, otherwise the anon key.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`BackendError::Api`] carrying the status
    /// and the body's message on failure.
    pub(crate) async fn ensure_success(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
