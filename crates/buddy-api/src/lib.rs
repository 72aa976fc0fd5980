//! # buddy-api
//!
//! HTTP shell built with the Axum framework.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, run, run_server, start_chat};
pub use state::AppState;
