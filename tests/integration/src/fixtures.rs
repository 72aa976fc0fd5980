//! Test fixtures
//!
//! A chat context wired to an in-process remote with a small directory.

use std::sync::Arc;

use anyhow::Result;
use buddy_common::{ChatConfig, RemoteConfig};
use buddy_core::{Message, User};
use buddy_remote::MemoryRemote;
use buddy_service::{ChatContext, SessionService};
use chrono::{DateTime, Utc};

pub const APP_ID: &str = "studybuddy-it";
pub const AUTH_KEY: &str = "it-auth-key";

/// Remote plus a context built on it
pub struct ChatFixture {
    pub remote: Arc<MemoryRemote>,
    pub ctx: ChatContext,
}

impl ChatFixture {
    /// Uninitialized context; the directory holds `bob` and `carol`
    pub fn new() -> Result<Self> {
        let remote = Arc::new(MemoryRemote::new(APP_ID, AUTH_KEY));
        remote.insert_user(User::new("bob", "Bob"));
        remote.insert_user(User::new("carol", "Carol"));

        let ctx = ChatContext::builder()
            .remote(remote.clone())
            .remote_config(remote_config())
            .chat_config(ChatConfig::default())
            .build()?;

        Ok(Self { remote, ctx })
    }

    /// Initialized and logged in as `uid`
    pub async fn logged_in(uid: &str, name: &str) -> Result<Self> {
        let fixture = Self::new()?;
        let session = fixture.session();
        session.initialize().await?;
        session.login(uid, name).await?;
        Ok(fixture)
    }

    pub fn session(&self) -> SessionService<'_> {
        SessionService::new(&self.ctx)
    }
}

impl Drop for ChatFixture {
    fn drop(&mut self) {
        self.ctx.shutdown();
    }
}

pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        app_id: APP_ID.to_string(),
        region: "eu".to_string(),
        auth_key: AUTH_KEY.to_string(),
    }
}

/// Timestamp `secs` seconds into the test epoch
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap_or_default()
}

/// A stored message between two users
pub fn stored_message(id: &str, text: &str, from: &str, to: &str, secs: i64) -> Message {
    Message::new(id, text, User::new(from, from), to, at(secs))
}
