//! In-memory remote chat service
//!
//! Models one client connection: a single logged-in user, the user
//! directory, the message log, and the push-event socket.

use std::collections::HashMap;

use async_trait::async_trait;
use buddy_core::{
    EventKind, Message, MessageKind, RemoteError, RemoteEvent, RemoteResult, RemoteService, RemoteSettings,
    User,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use super::RemoteOperation;

/// Event channel capacity
const EVENT_BUFFER: usize = 256;

/// Order in which `fetch_messages` returns its page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchOrder {
    /// Newest first, like the hosted service
    #[default]
    NewestFirst,
    /// Whatever order the messages were stored in
    Stored,
}

#[derive(Default)]
struct MemoryState {
    initialized: bool,
    socket_open: bool,
    presence_for_all_users: bool,
    users: Vec<User>,
    messages: Vec<Message>,
    session: Option<String>,
    next_message_id: u64,
    failures: HashMap<RemoteOperation, RemoteError>,
    calls: Vec<RemoteOperation>,
    echo_own_messages: bool,
    fetch_order: FetchOrder,
}

impl MemoryState {
    fn user(&self, uid: &str) -> Option<&User> {
        self.users.iter().find(|u| u.uid == uid)
    }

    fn session_user(&self) -> RemoteResult<User> {
        let uid = self.session.as_deref().ok_or(RemoteError::NotLoggedIn)?;
        self.user(uid)
            .cloned()
            .ok_or_else(|| RemoteError::UidNotFound(uid.to_string()))
    }

    fn next_id(&mut self) -> String {
        self.next_message_id += 1;
        self.next_message_id.to_string()
    }

    fn require_initialized(&self) -> RemoteResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RemoteError::NotInitialized)
        }
    }
}

/// In-process implementation of [`RemoteService`]
pub struct MemoryRemote {
    app_id: String,
    auth_key: String,
    state: Mutex<MemoryState>,
    events: broadcast::Sender<RemoteEvent>,
}

impl MemoryRemote {
    /// Create a backend that accepts the given app id and auth key
    pub fn new(app_id: impl Into<String>, auth_key: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            app_id: app_id.into(),
            auth_key: auth_key.into(),
            state: Mutex::new(MemoryState {
                next_message_id: 100,
                ..MemoryState::default()
            }),
            events,
        }
    }

    // === Test hooks ===

    /// Make the next call of `op` fail with `error`
    pub fn fail_next(&self, op: RemoteOperation, error: RemoteError) {
        self.state.lock().failures.insert(op, error);
    }

    /// Echo messages sent by the logged-in user back over the event channel
    pub fn echo_own_messages(&self, echo: bool) {
        self.state.lock().echo_own_messages = echo;
    }

    /// Choose the order of `fetch_messages` pages
    pub fn set_fetch_order(&self, order: FetchOrder) {
        self.state.lock().fetch_order = order;
    }

    /// Add a user to the directory without going through `create_user`
    pub fn insert_user(&self, user: User) {
        let mut state = self.state.lock();
        if state.user(&user.uid).is_none() {
            state.users.push(user);
        }
    }

    /// Store a message as-is, without emitting an event
    pub fn seed_message(&self, message: Message) {
        self.state.lock().messages.push(message);
    }

    /// Deliver a text message from `sender_uid` to the logged-in user
    pub fn deliver(&self, sender_uid: &str, text: &str) -> RemoteResult<Message> {
        self.deliver_kind(sender_uid, text, MessageKind::Text)
    }

    /// Deliver a media message from `sender_uid` to the logged-in user
    pub fn deliver_media(&self, sender_uid: &str, url: &str) -> RemoteResult<Message> {
        self.deliver_kind(sender_uid, url, MessageKind::Media)
    }

    fn deliver_kind(&self, sender_uid: &str, text: &str, kind: MessageKind) -> RemoteResult<Message> {
        let message = {
            let mut state = self.state.lock();
            let receiver = state.session_user()?;
            let sender = state
                .user(sender_uid)
                .cloned()
                .ok_or_else(|| RemoteError::UidNotFound(sender_uid.to_string()))?;
            let id = state.next_id();
            let message = Message::new(id, text, sender, receiver.uid, now_seconds()).with_kind(kind);
            state.messages.push(message.clone());
            message
        };

        let event = match kind {
            MessageKind::Text => RemoteEvent::TextMessageReceived(message.clone()),
            MessageKind::Media => RemoteEvent::MediaMessageReceived(message.clone()),
        };
        self.emit(event);
        Ok(message)
    }

    /// Push a raw event over the event channel
    ///
    /// Dropped while the socket is closed, and presence events are dropped
    /// unless presence for all users was requested.
    pub fn emit(&self, event: RemoteEvent) {
        {
            let state = self.state.lock();
            let wanted = match event.kind() {
                EventKind::Message => state.socket_open,
                EventKind::User => state.socket_open && state.presence_for_all_users,
            };
            if !wanted {
                trace!(event = event.name(), "Remote event dropped");
                return;
            }
        }

        trace!(event = event.name(), "Emitting remote event");
        // Fails only when nobody is subscribed
        self.events.send(event).ok();
    }

    /// Report a user as online
    pub fn set_online(&self, uid: &str) {
        let user = self.presence_user(uid);
        self.emit(RemoteEvent::UserOnline(user));
    }

    /// Report a user as offline
    pub fn set_offline(&self, uid: &str) {
        let user = self.presence_user(uid);
        self.emit(RemoteEvent::UserOffline(user));
    }

    fn presence_user(&self, uid: &str) -> User {
        self.state
            .lock()
            .user(uid)
            .cloned()
            .unwrap_or_else(|| User::new(uid, uid))
    }

    // === Inspection ===

    /// Number of calls of `op` so far
    pub fn call_count(&self, op: RemoteOperation) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == op).count()
    }

    /// Snapshot of the user directory
    pub fn users(&self) -> Vec<User> {
        self.state.lock().users.clone()
    }

    /// Snapshot of the message log
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages.clone()
    }

    /// Record the call and take any injected failure for it
    fn enter(&self, op: RemoteOperation) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.push(op);
        match state.failures.remove(&op) {
            Some(err) => {
                debug!(operation = %op, error = %err, "Injected remote failure");
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn check_auth_key(&self, auth_key: &str) -> RemoteResult<()> {
        if auth_key == self.auth_key {
            Ok(())
        } else {
            Err(RemoteError::InvalidAuthKey)
        }
    }
}

impl std::fmt::Debug for MemoryRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryRemote")
            .field("app_id", &self.app_id)
            .field("initialized", &state.initialized)
            .field("users", &state.users.len())
            .field("messages", &state.messages.len())
            .field("session", &state.session)
            .finish()
    }
}

#[async_trait]
impl RemoteService for MemoryRemote {
    async fn init(&self, settings: &RemoteSettings) -> RemoteResult<()> {
        self.enter(RemoteOperation::Init)?;

        if settings.app_id != self.app_id {
            return Err(RemoteError::InvalidSettings(format!(
                "unknown app id {}",
                settings.app_id
            )));
        }
        if settings.region.trim().is_empty() {
            return Err(RemoteError::InvalidSettings("region is required".to_string()));
        }

        {
            let mut state = self.state.lock();
            state.initialized = true;
            state.socket_open = settings.auto_establish_socket;
            state.presence_for_all_users = settings.presence_for_all_users;
        }
        debug!(app_id = %settings.app_id, region = %settings.region, "Remote initialized");
        Ok(())
    }

    async fn create_user(&self, uid: &str, name: &str, auth_key: &str) -> RemoteResult<User> {
        self.enter(RemoteOperation::CreateUser)?;
        self.check_auth_key(auth_key)?;

        let mut state = self.state.lock();
        state.require_initialized()?;

        if uid.trim().is_empty() {
            return Err(RemoteError::InvalidInput("uid is required".to_string()));
        }
        if state.user(uid).is_some() {
            return Err(RemoteError::UidAlreadyExists(uid.to_string()));
        }

        let user = User::new(uid, name);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn login(&self, uid: &str, auth_key: &str) -> RemoteResult<User> {
        self.enter(RemoteOperation::Login)?;
        self.check_auth_key(auth_key)?;

        let mut state = self.state.lock();
        state.require_initialized()?;

        let user = state
            .user(uid)
            .cloned()
            .ok_or_else(|| RemoteError::UidNotFound(uid.to_string()))?;
        state.session = Some(user.uid.clone());
        Ok(user)
    }

    async fn logout(&self) -> RemoteResult<()> {
        self.enter(RemoteOperation::Logout)?;

        let mut state = self.state.lock();
        state.require_initialized()?;
        state.session = None;
        Ok(())
    }

    async fn logged_in_user(&self) -> RemoteResult<Option<User>> {
        self.enter(RemoteOperation::LoggedInUser)?;

        let state = self.state.lock();
        state.require_initialized()?;
        Ok(state.session.as_deref().and_then(|uid| state.user(uid)).cloned())
    }

    async fn list_users(&self, limit: u32) -> RemoteResult<Vec<User>> {
        self.enter(RemoteOperation::ListUsers)?;

        let state = self.state.lock();
        state.require_initialized()?;
        state.session_user()?;

        Ok(state.users.iter().take(limit as usize).cloned().collect())
    }

    async fn send_message(&self, receiver_uid: &str, text: &str) -> RemoteResult<Message> {
        self.enter(RemoteOperation::SendMessage)?;

        let (message, echo) = {
            let mut state = self.state.lock();
            state.require_initialized()?;
            let sender = state.session_user()?;
            if state.user(receiver_uid).is_none() {
                return Err(RemoteError::UidNotFound(receiver_uid.to_string()));
            }

            let id = state.next_id();
            let message = Message::new(id, text, sender, receiver_uid, now_seconds());
            state.messages.push(message.clone());
            (message, state.echo_own_messages)
        };

        if echo {
            self.emit(RemoteEvent::TextMessageReceived(message.clone()));
        }
        Ok(message)
    }

    async fn fetch_messages(&self, partner_uid: &str, limit: u32) -> RemoteResult<Vec<Message>> {
        self.enter(RemoteOperation::FetchMessages)?;

        let state = self.state.lock();
        state.require_initialized()?;
        let me = state.session_user()?;

        let mut page: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.is_between(&me.uid, partner_uid))
            .cloned()
            .collect();

        if state.fetch_order == FetchOrder::NewestFirst {
            // Later-stored messages win ties on equal timestamps
            page.reverse();
            page.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        }
        page.truncate(limit as usize);

        Ok(page)
    }

    fn events(&self) -> broadcast::Receiver<RemoteEvent> {
        self.events.subscribe()
    }
}

/// Current time truncated to whole seconds
fn now_seconds() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default()
}
