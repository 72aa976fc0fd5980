//! Health check handler

use axum::{extract::State, Json};
use buddy_service::HealthResponse;

use crate::state::AppState;

/// Liveness probe
///
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.app_name()))
}
