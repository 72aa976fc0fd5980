//! Remote event delivery
//!
//! The registry holds named listeners; the pump feeds it from the remote
//! service's event channel.

mod pump;
mod registry;

pub use pump::EventPump;
pub use registry::{EventRegistry, Listener, ListenerKey, MessageListener, Subscription, UserListener};
