//! Push events delivered by the remote service

mod remote_event;

pub use remote_event::{EventKind, RemoteEvent};
