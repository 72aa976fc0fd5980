//! User entity - a member of the remote user directory

use serde::{Deserialize, Serialize};

/// A user as known to the remote service.
///
/// The uid is assigned by whoever creates the user and never changes.
/// Online/offline status is not stored here; it is derived from the
/// presence set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Create a new User
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            avatar: None,
        }
    }

    /// Update the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Letter shown when there is no avatar: first letter of the display
    /// name, falling back to the uid.
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim()
            .chars()
            .next()
            .or_else(|| self.uid.chars().next())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }

    /// Check whether this is the user with the given uid
    #[inline]
    pub fn is(&self, uid: &str) -> bool {
        self.uid == uid
    }
}
