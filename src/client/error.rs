//! Backend client error types

use thiserror::Error;

/// Errors that can occur when talking to the DevCare backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused or host unreachable
    #[error("DevCare backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Body was not valid JSON or did not match the expected shape
    #[error("Malformed payload: {0}")]
    Parse(String),
}

impl ClientError {
    /// Classify a transport-level reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

/// Result type alias for backend calls
pub type ClientResult<T> = Result<T, ClientError>;
