//! Ports the domain layer depends on

mod remote;

pub use remote::{RemoteResult, RemoteService, RemoteSettings};
