//! Application state
//!
//! Holds the shared state for the Axum application.

use std::sync::Arc;

use buddy_common::AppConfig;
use buddy_service::ChatContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    chat: ChatContext,
}

impl AppState {
    pub fn new(config: AppConfig, chat: ChatContext) -> Self {
        Self {
            config: Arc::new(config),
            chat,
        }
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the chat session context
    pub fn chat(&self) -> &ChatContext {
        &self.chat
    }

    pub fn app_name(&self) -> &str {
        &self.config.app.name
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app", &self.config.app.name)
            .field("env", &self.config.app.env)
            .field("chat", &self.chat)
            .finish()
    }
}
