//! Shared fixtures for unit tests

use std::sync::Arc;
use std::time::Duration;

use buddy_common::RemoteConfig;
use buddy_core::User;
use buddy_remote::MemoryRemote;
use chrono::{DateTime, Utc};

use crate::services::{ChatContext, SessionService};

pub const APP_ID: &str = "studybuddy-test";
pub const AUTH_KEY: &str = "test-auth-key";

pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        app_id: APP_ID.to_string(),
        region: "eu".to_string(),
        auth_key: AUTH_KEY.to_string(),
    }
}

pub fn remote() -> Arc<MemoryRemote> {
    Arc::new(MemoryRemote::new(APP_ID, AUTH_KEY))
}

pub fn context(remote: &Arc<MemoryRemote>) -> ChatContext {
    ChatContext::builder()
        .remote(remote.clone())
        .remote_config(remote_config())
        .build()
        .unwrap()
}

/// Initialized context logged in as `uid`, with `bob` and `carol` in the directory
pub async fn logged_in(uid: &str) -> (Arc<MemoryRemote>, ChatContext) {
    let remote = remote();
    let ctx = context(&remote);
    let session = SessionService::new(&ctx);

    session.initialize().await.unwrap();
    session.login(uid, "Alice").await.unwrap();
    remote.insert_user(User::new("bob", "Bob"));
    remote.insert_user(User::new("carol", "Carol"));

    (remote, ctx)
}

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

/// Poll `condition` until it holds or a second has passed
pub async fn wait_for(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
