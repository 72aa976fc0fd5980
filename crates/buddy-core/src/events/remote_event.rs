//! Remote events - what the remote service pushes over its event channel

use crate::entities::{Message, User};

/// Listener family an event is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Incoming text and media messages
    Message,
    /// User presence transitions
    User,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message => write!(f, "message"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Event pushed by the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    TextMessageReceived(Message),
    MediaMessageReceived(Message),
    UserOnline(User),
    UserOffline(User),
}

impl RemoteEvent {
    /// Listener family this event is delivered to
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TextMessageReceived(_) | Self::MediaMessageReceived(_) => EventKind::Message,
            Self::UserOnline(_) | Self::UserOffline(_) => EventKind::User,
        }
    }

    /// Callback name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextMessageReceived(_) => "onTextMessageReceived",
            Self::MediaMessageReceived(_) => "onMediaMessageReceived",
            Self::UserOnline(_) => "onUserOnline",
            Self::UserOffline(_) => "onUserOffline",
        }
    }
}
