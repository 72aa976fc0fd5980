//! Error types for the domain layer

mod remote_error;

pub use remote_error::RemoteError;
