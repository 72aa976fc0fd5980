//! Remote service trait (port) - the hosted chat backend
//!
//! The domain layer defines what it needs from the remote service; a concrete
//! backend (vendor client, in-process sandbox) provides the implementation.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::entities::{Message, User};
use crate::error::RemoteError;
use crate::events::RemoteEvent;

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Connection settings handed to the remote on initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub app_id: String,
    pub region: String,
    /// Subscribe to presence events for every user, not only friends
    pub presence_for_all_users: bool,
    /// Open the push-event socket as part of initialization
    pub auto_establish_socket: bool,
}

impl RemoteSettings {
    /// Settings with the defaults used by the chat client
    pub fn new(app_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            region: region.into(),
            presence_for_all_users: true,
            auto_establish_socket: true,
        }
    }
}

#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Establish the connection to the remote application
    async fn init(&self, settings: &RemoteSettings) -> RemoteResult<()>;

    /// Create a user; fails with `UidAlreadyExists` when the uid is taken
    async fn create_user(&self, uid: &str, name: &str, auth_key: &str) -> RemoteResult<User>;

    /// Authenticate as the given user
    async fn login(&self, uid: &str, auth_key: &str) -> RemoteResult<User>;

    /// End the current session
    async fn logout(&self) -> RemoteResult<()>;

    /// The user of the active session, if any
    async fn logged_in_user(&self) -> RemoteResult<Option<User>>;

    /// First page of the user directory
    async fn list_users(&self, limit: u32) -> RemoteResult<Vec<User>>;

    /// Send a text message to a user
    async fn send_message(&self, receiver_uid: &str, text: &str) -> RemoteResult<Message>;

    /// Most recent messages with a user, newest first
    async fn fetch_messages(&self, partner_uid: &str, limit: u32) -> RemoteResult<Vec<Message>>;

    /// Subscribe to the push-event channel
    fn events(&self) -> broadcast::Receiver<RemoteEvent>;
}
