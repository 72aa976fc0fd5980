//! Route definitions

use axum::{routing::get, Router};

use crate::handlers::{fallback, health};
use crate::state::AppState;

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .fallback(fallback::not_found)
}
