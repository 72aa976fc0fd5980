//! # buddy-remote
//!
//! Backends implementing [`buddy_core::RemoteService`].
//!
//! The hosted chat service is an external collaborator and is not
//! reimplemented here. [`MemoryRemote`] keeps users, messages, and a single
//! client session in memory so the adapter can run locally and be tested
//! without network access.

pub mod memory;

pub use memory::{FetchOrder, MemoryRemote, RemoteOperation};
