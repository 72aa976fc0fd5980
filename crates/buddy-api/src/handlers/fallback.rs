//! Fallback for unknown routes

use axum::http::{Method, Uri};

use crate::response::ApiError;

/// JSON 404 for any route that is not served
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
