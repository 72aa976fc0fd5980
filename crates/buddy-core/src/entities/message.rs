//! Message entity - a one-to-one chat message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Kind of message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Media,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Media => write!(f, "media"),
        }
    }
}

/// Message entity
///
/// `id` and `sent_at` are assigned by the remote service; a message only
/// exists on this side once the remote has confirmed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: User,
    pub receiver: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: MessageKind,
}

impl Message {
    /// Create a new text message
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        sender: User,
        receiver: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender,
            receiver: receiver.into(),
            sent_at,
            kind: MessageKind::Text,
        }
    }

    /// Change the payload kind
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if the message was sent by the given user
    #[inline]
    pub fn is_from(&self, uid: &str) -> bool {
        self.sender.uid == uid
    }

    /// Check if the message is part of the conversation with `partner`
    pub fn belongs_to(&self, partner: &str) -> bool {
        self.is_from(partner) || self.receiver == partner
    }

    /// Check if the message involves both users (either direction)
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.is_from(a) && self.receiver == b) || (self.is_from(b) && self.receiver == a)
    }
}

/// Check whether a message body has anything worth sending
#[inline]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
