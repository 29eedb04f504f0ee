//! Error types for the Redash API client.

use thiserror::Error;

/// Base error type for Redash operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Raised when the base URL is missing or cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raised when no usable API key could be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raised by the endpoint catalog when the server answers with a non-2xx status.
#[derive(Error, Debug)]
#[error("{message} (status {status_code})")]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
    pub response_body: Vec<u8>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: u16, response_body: Vec<u8>) -> Self {
        Self {
            message: message.into(),
            status_code,
            response_body,
        }
    }
}
