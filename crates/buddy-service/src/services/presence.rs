//! Presence tracker
//!
//! Keeps the set of online users, fed by presence events.

use std::sync::{Arc, Weak};

use buddy_core::{PresenceSet, PresenceStatus, User};
use parking_lot::RwLock;
use tracing::debug;

use crate::events::{Listener, Subscription, UserListener};

use super::context::ChatContext;

/// Listener id the tracker registers under
pub const PRESENCE_LISTENER_ID: &str = "USER_PRESENCE_LISTENER";

struct PresenceListener {
    online: Weak<RwLock<PresenceSet>>,
}

impl UserListener for PresenceListener {
    fn on_user_online(&self, user: &User) {
        if let Some(online) = self.online.upgrade() {
            if online.write().mark_online(user.uid.clone()) {
                debug!(uid = %user.uid, "User online");
            }
        }
    }

    fn on_user_offline(&self, user: &User) {
        if let Some(online) = self.online.upgrade() {
            if online.write().mark_offline(&user.uid) {
                debug!(uid = %user.uid, "User offline");
            }
        }
    }
}

/// Set of currently online users
///
/// Starts empty. Dropping the tracker unregisters its listener.
pub struct PresenceTracker {
    online: Arc<RwLock<PresenceSet>>,
    subscription: Subscription,
}

impl PresenceTracker {
    /// Register the presence listener on the context's registry
    pub fn start(ctx: &ChatContext) -> Self {
        let online = Arc::new(RwLock::new(PresenceSet::new()));
        let subscription = ctx.registry().subscribe(
            PRESENCE_LISTENER_ID,
            Listener::user(PresenceListener {
                online: Arc::downgrade(&online),
            }),
        );

        Self {
            online,
            subscription,
        }
    }

    pub fn is_online(&self, uid: &str) -> bool {
        self.online.read().contains(uid)
    }

    pub fn status(&self, uid: &str) -> PresenceStatus {
        self.online.read().status(uid)
    }

    /// Online uids in sorted order
    pub fn online_users(&self) -> Vec<String> {
        self.online.read().sorted()
    }

    pub fn online_count(&self) -> usize {
        self.online.read().len()
    }

    /// Whether the listener is still registered
    pub fn is_listening(&self) -> bool {
        self.subscription.is_active()
    }
}

impl std::fmt::Debug for PresenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceTracker")
            .field("online", &self.online_count())
            .field("listening", &self.is_listening())
            .finish()
    }
}
