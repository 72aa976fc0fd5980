//! Test helpers for integration tests
//!
//! Spawns test servers and polls for asynchronously delivered events.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use buddy_api::{create_app, run_server, start_chat, AppState};
use buddy_common::AppConfig;
use buddy_remote::MemoryRemote;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with the default test config
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(&[])?).await
    }

    /// Start a test server with custom config on an ephemeral port
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let remote = Arc::new(MemoryRemote::new(
            config.remote.app_id.clone(),
            config.remote.auth_key.clone(),
        ));
        let chat = start_chat(&config, remote).await?;
        let app = create_app(AppState::new(config, chat.clone()));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            run_server(app, listener).await.ok();
            chat.shutdown();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with an `Origin` header
    pub async fn get_with_origin(&self, path: &str, origin: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).header("Origin", origin).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build a test configuration with fixed credentials plus `overrides`
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let lookup = |key: &str| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
            .or_else(|| match key {
                "CHAT_APP_ID" => Some(crate::fixtures::APP_ID.to_string()),
                "CHAT_REGION" => Some("eu".to_string()),
                "CHAT_AUTH_KEY" => Some(crate::fixtures::AUTH_KEY.to_string()),
                _ => None,
            })
    };

    AppConfig::from_lookup(lookup).map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Poll `condition` until it holds or two seconds have passed
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}
