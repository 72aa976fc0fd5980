//! Event pump
//!
//! Drains the remote service's push-event channel and dispatches each event
//! through the registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use buddy_core::RemoteEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::EventRegistry;

/// Background task feeding remote events into an [`EventRegistry`]
///
/// Dropping the pump stops it.
pub struct EventPump {
    handle: JoinHandle<()>,
    running: Arc<AtomicBool>,
}

impl EventPump {
    /// Spawn the pump on the current runtime
    pub fn start(receiver: broadcast::Receiver<RemoteEvent>, registry: EventRegistry) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(run(receiver, registry, running.clone()));

        tracing::info!("Event pump started");

        Self { handle, running }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    /// Stop the pump; events still queued are discarded
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.handle.abort();
            tracing::info!("Event pump stopped");
        }
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for EventPump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPump")
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run(
    mut receiver: broadcast::Receiver<RemoteEvent>,
    registry: EventRegistry,
    running: Arc<AtomicBool>,
) {
    while running.load(Ordering::SeqCst) {
        match receiver.recv().await {
            Ok(event) => {
                registry.dispatch(&event);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "Event pump lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::warn!("Remote event channel closed");
                break;
            }
        }
    }

    running.store(false, Ordering::SeqCst);
    tracing::debug!("Event pump loop ended");
}
