//! Remote errors - failures reported by the remote chat service

use thiserror::Error;

/// Errors reported by a [`RemoteService`](crate::traits::RemoteService)
/// implementation.
///
/// Codes mirror the vendor's error codes so callers can match on the one
/// failure that is expected during login (`ERR_UID_ALREADY_EXISTS`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    // =========================================================================
    // Session
    // =========================================================================
    #[error("Remote service is not initialized")]
    NotInitialized,

    #[error("Invalid app settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid auth key")]
    InvalidAuthKey,

    #[error("No user is logged in")]
    NotLoggedIn,

    // =========================================================================
    // Users
    // =========================================================================
    #[error("User already exists: {0}")]
    UidAlreadyExists(String),

    #[error("User not found: {0}")]
    UidNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // =========================================================================
    // Transport
    // =========================================================================
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{message}")]
    Api { code: String, message: String },
}

impl RemoteError {
    /// Get the vendor-style error code
    pub fn code(&self) -> &str {
        match self {
            Self::NotInitialized => "ERR_NOT_INITIALIZED",
            Self::InvalidSettings(_) => "ERR_INVALID_APP_SETTINGS",
            Self::InvalidAuthKey => "ERR_AUTH_KEY_INVALID",
            Self::NotLoggedIn => "ERR_NOT_LOGGED_IN",
            Self::UidAlreadyExists(_) => "ERR_UID_ALREADY_EXISTS",
            Self::UidNotFound(_) => "ERR_UID_NOT_FOUND",
            Self::InvalidInput(_) => "ERR_BAD_REQUEST",
            Self::Transport(_) => "ERR_REQUEST_FAILED",
            Self::Api { code, .. } => code,
        }
    }

    /// Create an error from a raw code and message
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Check if this is the "user already exists" error
    pub fn is_already_exists(&self) -> bool {
        self.code() == "ERR_UID_ALREADY_EXISTS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RemoteError::UidAlreadyExists("alice".to_string()).code(),
            "ERR_UID_ALREADY_EXISTS"
        );
        assert_eq!(RemoteError::NotLoggedIn.code(), "ERR_NOT_LOGGED_IN");
        assert_eq!(RemoteError::api("ERR_CUSTOM", "boom").code(), "ERR_CUSTOM");
    }

    #[test]
    fn test_is_already_exists() {
        assert!(RemoteError::UidAlreadyExists("alice".to_string()).is_already_exists());
        assert!(RemoteError::api("ERR_UID_ALREADY_EXISTS", "taken").is_already_exists());
        assert!(!RemoteError::UidNotFound("alice".to_string()).is_already_exists());
        assert!(!RemoteError::transport("timeout").is_already_exists());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RemoteError::UidNotFound("bob".to_string()).to_string(),
            "User not found: bob"
        );
        assert_eq!(RemoteError::api("ERR_X", "remote said no").to_string(), "remote said no");
    }
}
