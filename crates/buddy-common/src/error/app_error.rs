//! Application error types
//!
//! Unified error handling for the server binary and anything that reports
//! errors over HTTP.

use serde::Serialize;
use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not logged in")]
    NotLoggedIn,

    // Remote chat service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("External service unavailable: {0}")]
    ServiceUnavailable(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Server lifecycle errors
    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotLoggedIn => 401,
            Self::ExternalService(_) => 502,
            Self::ServiceUnavailable(_) => 503,
            Self::Config(_) | Self::Server(_) => 500,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotLoggedIn => "NOT_LOGGED_IN",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Server(_) => "SERVER_ERROR",
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code())
    }

    /// Create an external service error
    #[must_use]
    pub fn external(msg: impl fmt::Display) -> Self {
        Self::ExternalService(msg.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
