//! Service layer error types
//!
//! One variant per adapter failure kind, each carrying the remote's error.

use buddy_common::AppError;
use buddy_core::RemoteError;
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The remote rejected initialization; sticky for the context
    #[error("Initialization failed: {0}")]
    Initialization(#[source] RemoteError),

    /// User creation or authentication failed
    #[error("Login failed: {0}")]
    Login(#[source] RemoteError),

    /// Directory or history retrieval failed
    #[error("Fetch failed: {0}")]
    Fetch(#[source] RemoteError),

    /// Message submission failed
    #[error("Send failed: {0}")]
    Send(#[source] RemoteError),

    /// The chat context could not be assembled
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The remote failure behind this error, if any
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Initialization(e) | Self::Login(e) | Self::Fetch(e) | Self::Send(e) => Some(e),
            Self::Config(_) => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Initialization(_) => 503,
            Self::Login(_) => 401,
            Self::Fetch(_) | Self::Send(_) => 502,
            Self::Config(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "INITIALIZATION_ERROR",
            Self::Login(_) => "LOGIN_ERROR",
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Send(_) => "SEND_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Initialization(e) => AppError::ServiceUnavailable(e.to_string()),
            ServiceError::Login(RemoteError::NotLoggedIn) => AppError::NotLoggedIn,
            ServiceError::Login(RemoteError::InvalidInput(msg))
            | ServiceError::Fetch(RemoteError::InvalidInput(msg))
            | ServiceError::Send(RemoteError::InvalidInput(msg)) => AppError::InvalidInput(msg),
            ServiceError::Login(e) | ServiceError::Fetch(e) | ServiceError::Send(e) => {
                AppError::external(format!("{} ({})", e, e.code()))
            }
            ServiceError::Config(msg) => AppError::Config(msg),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
