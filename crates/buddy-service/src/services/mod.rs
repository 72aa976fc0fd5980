//! Chat services
//!
//! Session, directory, conversation, and presence handling on top of a
//! shared [`ChatContext`].

pub mod context;
pub mod conversation;
pub mod directory;
pub mod error;
pub mod presence;
pub mod session;

pub use context::{ChatContext, ChatContextBuilder};
pub use conversation::{message_listener_id, ConversationStore};
pub use directory::DirectoryService;
pub use error::{ServiceError, ServiceResult};
pub use presence::{PresenceTracker, PRESENCE_LISTENER_ID};
pub use session::SessionService;

use buddy_common::MAX_PAGE_LIMIT;

/// Resolve a requested page size against the configured default
pub(crate) fn page_limit(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, MAX_PAGE_LIMIT)
}
