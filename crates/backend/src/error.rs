/// Errors from the hosted backend layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Backend API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The addressed record does not exist.
    #[error("Record not found")]
    NotFound,

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The backend refused the credentials or session. The message is the
    /// backend's own and is meant to be shown to the user as-is.
    #[error("{0}")]
    Rejected(String),
}

/// Pull a human-readable message out of a backend error body.
///
/// PostgREST and Storage use `message`, GoTrue uses `msg` or
/// `error_description`; `error` is the last resort before the raw body.
pub fn api_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(serde_json::Value::String(s)) = map.get(key) {
                if !s.is_empty() {
                    return s.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "<empty body>".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gotrue_msg_wins() {
        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_eq!(api_message(body), "Invalid login credentials");
    }

    #[test]
    fn legacy_gotrue_error_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
        assert_eq!(api_message(body), "Email not confirmed");
    }

    #[test]
    fn postgrest_message() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table games"}"#;
        assert_eq!(api_message(body), "permission denied for table games");
    }

    #[test]
    fn non_json_body_is_returned_trimmed() {
        assert_eq!(api_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(api_message(""), "<empty body>");
    }

    #[test]
    fn rejected_displays_message_verbatim() {
        let err = BackendError::Rejected("Invalid login credentials".into());
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
