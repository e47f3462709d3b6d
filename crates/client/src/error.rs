//! Client error types.

use budgetsync_core::remote::NetworkError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("SSE parse error: {0}")]
    SseParse(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for NetworkError {
    fn from(error: ClientError) -> Self {
        let message = match &error {
            ClientError::Request(_) | ClientError::Connection(_) => {
                "Could not reach the collaboration backend"
            }
            ClientError::ServerError { .. } | ClientError::NotFound { .. } => {
                "Collaboration backend rejected the request"
            }
            ClientError::SseParse(_) | ClientError::Json(_) => {
                "Unexpected response from the collaboration backend"
            }
        };
        NetworkError::with_cause(message, error)
    }
}
