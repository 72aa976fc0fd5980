//! Presence value objects
//!
//! Presence is binary: a uid in the set is online, anything else is offline.
//! There is no expiry; entries change only when online/offline events arrive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Online status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
}

impl PresenceStatus {
    #[inline]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl From<bool> for PresenceStatus {
    fn from(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

/// Set of uids currently online
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSet {
    online: HashSet<String>,
}

impl PresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user online. Returns `true` if they were offline before.
    pub fn mark_online(&mut self, uid: impl Into<String>) -> bool {
        self.online.insert(uid.into())
    }

    /// Mark a user offline. Returns `true` if they were online before.
    pub fn mark_offline(&mut self, uid: &str) -> bool {
        self.online.remove(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.online.contains(uid)
    }

    pub fn status(&self, uid: &str) -> PresenceStatus {
        self.contains(uid).into()
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }

    /// Online uids in lexical order
    pub fn sorted(&self) -> Vec<String> {
        let mut uids: Vec<String> = self.online.iter().cloned().collect();
        uids.sort_unstable();
        uids
    }
}
