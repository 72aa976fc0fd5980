//! Integration test utilities
//!
//! Helpers for running end-to-end tests against the HTTP shell and the chat
//! adapter backed by the in-process remote.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
