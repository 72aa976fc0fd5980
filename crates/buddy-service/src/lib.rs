//! # buddy-service
//!
//! Application layer: the chat context, the event registry and pump, and the
//! session, directory, conversation, and presence services built on top of a
//! [`RemoteService`](buddy_core::RemoteService).

pub mod dto;
pub mod events;
pub mod services;

pub use dto::{HealthResponse, RosterEntry};
pub use events::{
    EventPump, EventRegistry, Listener, ListenerKey, MessageListener, Subscription, UserListener,
};
pub use services::{
    message_listener_id, ChatContext, ChatContextBuilder, ConversationStore, DirectoryService,
    PresenceTracker, ServiceError, ServiceResult, SessionService, PRESENCE_LISTENER_ID,
};

#[cfg(test)]
pub(crate) mod test_support;
