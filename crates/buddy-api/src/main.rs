//! StudyBuddy API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p buddy-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use std::sync::Arc;

use buddy_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use buddy_remote::MemoryRemote;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    let env = config.as_ref().map(|c| c.app.env).unwrap_or_default();
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Configuration loaded"
    );

    let remote = Arc::new(MemoryRemote::new(
        config.remote.app_id.clone(),
        config.remote.auth_key.clone(),
    ));
    info!(app_id = %config.remote.app_id, "Using in-process remote service");

    if let Err(e) = buddy_api::run(config, remote).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
