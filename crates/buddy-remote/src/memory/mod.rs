//! In-process remote backend

mod operation;
mod remote;

pub use operation::RemoteOperation;
pub use remote::{FetchOrder, MemoryRemote};
