//! # buddy-core
//!
//! Domain layer containing entities, the remote service port, presence value
//! objects, and the push events the remote service delivers.
//! This crate has no dependency on the HTTP shell or on any concrete backend.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{is_blank, Message, MessageKind, User};
pub use error::RemoteError;
pub use events::{EventKind, RemoteEvent};
pub use traits::{RemoteResult, RemoteService, RemoteSettings};
pub use value_objects::{PresenceSet, PresenceStatus};
