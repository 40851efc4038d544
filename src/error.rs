//! Error types for the users API client.
//!
//! Failures of a request fall into three buckets: the transport failed,
//! the backend answered with a non-2xx status, or the body was not the JSON
//! we expected. Validation failures never get this far; see
//! [`crate::validate::ValidationError`].

/// Errors produced by [`crate::api::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request could not be completed (unreachable host, reset
    /// connection, client construction failure).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` carries the backend's `{"error": "..."}` text when present.
    #[error("backend returned status {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// The response body could not be parsed as the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

/// Result alias for API client operations.
pub type Result<T> = std::result::Result<T, Error>;
