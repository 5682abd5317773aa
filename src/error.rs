//! Error types for the paymob library

use thiserror::Error;

/// Result type alias for paymob operations
pub type Result<T> = std::result::Result<T, PaymobError>;

/// Main error type for paymob operations
///
/// Only calls against the Accept API and configuration loading produce these.
/// Inbound callback verification reports a plain `bool` instead.
#[derive(Error, Debug)]
pub enum PaymobError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status returned by the Accept API
    #[error("Paymob returned status {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    /// The Accept API answered with a body we could not make sense of
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaymobError {
    /// Create an API error from a status code and decoded body
    pub fn api(status: u16, body: serde_json::Value) -> Self {
        Self::Api { status, body }
    }

    /// Create an unexpected response error
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
