//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.

use buddy_core::{PresenceStatus, User};
use serde::Serialize;

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    /// Healthy response naming the running application
    pub fn ok(app_name: &str) -> Self {
        Self {
            status: "ok".to_string(),
            message: format!("{app_name} server is running"),
        }
    }
}

/// One row of the user list: a user other than the logged-in one, with presence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub uid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Avatar fallback letter
    pub initial: Option<char>,
    pub status: PresenceStatus,
}

impl RosterEntry {
    pub fn new(user: User, status: PresenceStatus) -> Self {
        let initial = user.initial();
        Self {
            uid: user.uid,
            name: user.name,
            avatar: user.avatar,
            initial,
            status,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }
}
