//! Value objects

mod presence;

pub use presence::{PresenceSet, PresenceStatus};
