//! Error types for the honeypot console

use thiserror::Error;

/// Main error type for the honeypot console
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The client gave up waiting; the backend may still complete the request
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Non-2xx response, message already extracted from the body
    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DashboardError::Timeout(_))
    }

    /// Message as the backend phrased it, without the variant prefix
    pub fn backend_message(&self) -> Option<String> {
        match self {
            DashboardError::ApiError { message, .. } if !message.is_empty() => {
                Some(message.clone())
            }
            DashboardError::ApiError { .. } => None,
            other => Some(other.to_string()),
        }
    }
}
