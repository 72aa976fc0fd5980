//! Chat context - dependency container for the chat services
//!
//! Owns the remote service handle, the event registry, the credentials, and
//! the session state shared by every service built on it.

use std::sync::Arc;

use buddy_common::{AppConfig, ChatConfig, RemoteConfig};
use buddy_core::{RemoteError, RemoteService, User};
use parking_lot::{Mutex, RwLock};

use crate::events::{EventPump, EventRegistry};

use super::error::{ServiceError, ServiceResult};

/// Outcome of `initialize`, remembered for the lifetime of the context
#[derive(Debug, Clone, Default)]
pub(crate) enum InitState {
    #[default]
    Uninitialized,
    Ready,
    Failed(RemoteError),
}

struct ContextInner {
    remote: Arc<dyn RemoteService>,
    registry: EventRegistry,
    remote_config: RemoteConfig,
    chat: ChatConfig,
    init: tokio::sync::Mutex<InitState>,
    current_user: RwLock<Option<User>>,
    pump: Mutex<Option<EventPump>>,
}

/// Shared session context
///
/// Constructed once at application start and handed to each service.
/// Cloning is cheap; all clones share the same state.
#[derive(Clone)]
pub struct ChatContext {
    inner: Arc<ContextInner>,
}

impl ChatContext {
    pub fn builder() -> ChatContextBuilder {
        ChatContextBuilder::new()
    }

    // === Dependencies ===

    /// Get the remote service
    pub fn remote(&self) -> &dyn RemoteService {
        self.inner.remote.as_ref()
    }

    /// Get the event registry
    pub fn registry(&self) -> &EventRegistry {
        &self.inner.registry
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.inner.remote_config
    }

    pub fn chat_config(&self) -> ChatConfig {
        self.inner.chat
    }

    // === Session state ===

    pub(crate) fn init_state(&self) -> &tokio::sync::Mutex<InitState> {
        &self.inner.init
    }

    /// Whether `initialize` has succeeded on this context
    pub async fn is_initialized(&self) -> bool {
        matches!(*self.inner.init.lock().await, InitState::Ready)
    }

    /// Last known logged-in user
    pub fn current_user(&self) -> Option<User> {
        self.inner.current_user.read().clone()
    }

    pub(crate) fn set_current_user(&self, user: Option<User>) {
        *self.inner.current_user.write() = user;
    }

    /// Start the event pump unless it is already running
    pub(crate) fn start_pump(&self) {
        let mut pump = self.inner.pump.lock();
        if pump.as_ref().is_some_and(EventPump::is_running) {
            return;
        }
        *pump = Some(EventPump::start(
            self.inner.remote.events(),
            self.inner.registry.clone(),
        ));
    }

    pub fn is_pump_running(&self) -> bool {
        self.inner.pump.lock().as_ref().is_some_and(EventPump::is_running)
    }

    /// Stop event delivery and forget the session
    pub fn shutdown(&self) {
        if let Some(pump) = self.inner.pump.lock().take() {
            pump.stop();
        }
        self.inner.registry.clear();
        self.set_current_user(None);

        tracing::info!("Chat context shut down");
    }
}

impl std::fmt::Debug for ChatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatContext")
            .field("remote_config", &self.inner.remote_config)
            .field("chat", &self.inner.chat)
            .field("registry", &self.inner.registry)
            .field("current_user", &self.current_user().map(|u| u.uid))
            .finish()
    }
}

/// Builder for creating ChatContext
#[derive(Default)]
pub struct ChatContextBuilder {
    remote: Option<Arc<dyn RemoteService>>,
    remote_config: Option<RemoteConfig>,
    chat: ChatConfig,
    registry: Option<EventRegistry>,
}

impl ChatContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the credentials and chat limits from the application config
    pub fn config(self, config: &AppConfig) -> Self {
        self.remote_config(config.remote.clone())
            .chat_config(config.chat)
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteService>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn remote_config(mut self, config: RemoteConfig) -> Self {
        self.remote_config = Some(config);
        self
    }

    pub fn chat_config(mut self, config: ChatConfig) -> Self {
        self.chat = config;
        self
    }

    pub fn registry(mut self, registry: EventRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the ChatContext
    ///
    /// # Errors
    /// Returns `ServiceError::Config` if the remote or its credentials are missing
    pub fn build(self) -> ServiceResult<ChatContext> {
        let remote = self
            .remote
            .ok_or_else(|| ServiceError::config("remote is required"))?;
        let remote_config = self
            .remote_config
            .ok_or_else(|| ServiceError::config("remote credentials are required"))?;

        Ok(ChatContext {
            inner: Arc::new(ContextInner {
                remote,
                registry: self.registry.unwrap_or_default(),
                remote_config,
                chat: self.chat,
                init: tokio::sync::Mutex::new(InitState::Uninitialized),
                current_user: RwLock::new(None),
                pump: Mutex::new(None),
            }),
        })
    }
}
