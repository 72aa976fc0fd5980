//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use buddy_common::{AppConfig, AppError};
use buddy_core::RemoteService;
use buddy_service::{ChatContext, SessionService};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = apply_middleware(
        create_router(),
        &config.cors,
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// Serve `app` on an already bound listener until Ctrl+C
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

/// Build the chat context for `config` and initialize it against `remote`
///
/// # Errors
/// Returns `AppError::ServiceUnavailable` if the remote rejects initialization
pub async fn start_chat(config: &AppConfig, remote: Arc<dyn RemoteService>) -> Result<ChatContext, AppError> {
    let chat = ChatContext::builder().config(config).remote(remote).build()?;
    SessionService::new(&chat).initialize().await?;
    Ok(chat)
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig, remote: Arc<dyn RemoteService>) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address {}: {e}", config.api.address())))?;

    let chat = start_chat(&config, remote).await?;

    info!("Starting {} HTTP server on {}", config.app.name, addr);

    let result = match TcpListener::bind(addr).await {
        Ok(listener) => {
            let state = AppState::new(config, chat.clone());
            run_server(create_app(state), listener).await
        }
        Err(e) => Err(AppError::Server(format!("Failed to bind to {addr}: {e}"))),
    };

    chat.shutdown();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
