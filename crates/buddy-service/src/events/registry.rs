//! Event subscription registry
//!
//! Named listeners for incoming messages and presence changes, keyed by
//! `(kind, listener id)`. Uses `DashMap` for concurrent access.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use buddy_core::{EventKind, Message, RemoteEvent, User};
use dashmap::DashMap;
use uuid::Uuid;

/// Receives incoming messages
pub trait MessageListener: Send + Sync {
    fn on_text_message_received(&self, message: &Message);

    fn on_media_message_received(&self, _message: &Message) {}
}

/// Closures receive both text and media messages
impl<F> MessageListener for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn on_text_message_received(&self, message: &Message) {
        self(message);
    }

    fn on_media_message_received(&self, message: &Message) {
        self(message);
    }
}

/// Receives presence transitions
pub trait UserListener: Send + Sync {
    fn on_user_online(&self, _user: &User) {}

    fn on_user_offline(&self, _user: &User) {}
}

/// A registered handler; the variant decides which events it receives
#[derive(Clone)]
pub enum Listener {
    Message(Arc<dyn MessageListener>),
    User(Arc<dyn UserListener>),
}

impl Listener {
    pub fn message(listener: impl MessageListener + 'static) -> Self {
        Self::Message(Arc::new(listener))
    }

    pub fn user(listener: impl UserListener + 'static) -> Self {
        Self::User(Arc::new(listener))
    }

    /// Event kind this listener is registered under
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message(_) => EventKind::Message,
            Self::User(_) => EventKind::User,
        }
    }

    /// Invoke the callback matching `event`. Returns false on a kind mismatch.
    fn deliver(&self, event: &RemoteEvent) -> bool {
        match (self, event) {
            (Self::Message(l), RemoteEvent::TextMessageReceived(m)) => {
                l.on_text_message_received(m);
            }
            (Self::Message(l), RemoteEvent::MediaMessageReceived(m)) => {
                l.on_media_message_received(m);
            }
            (Self::User(l), RemoteEvent::UserOnline(u)) => l.on_user_online(u),
            (Self::User(l), RemoteEvent::UserOffline(u)) => l.on_user_offline(u),
            _ => return false,
        }
        true
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.kind())
    }
}

/// Registration key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    pub kind: EventKind,
    pub id: String,
}

impl ListenerKey {
    pub fn new(kind: EventKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

struct Registration {
    generation: u64,
    listener: Listener,
}

#[derive(Default)]
struct RegistryInner {
    listeners: DashMap<ListenerKey, Registration>,
    generation: AtomicU64,
}

/// Table of named listeners
///
/// Cloning is cheap and every clone shares the same table.
#[derive(Clone, Default)]
pub struct EventRegistry {
    inner: Arc<RegistryInner>,
}

impl EventRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `(listener.kind(), listener_id)`
    ///
    /// An existing registration under the same key is replaced.
    pub fn subscribe(&self, listener_id: impl Into<String>, listener: Listener) -> Subscription {
        let key = ListenerKey::new(listener.kind(), listener_id);
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;

        let replaced = self
            .inner
            .listeners
            .insert(key.clone(), Registration { generation, listener })
            .is_some();

        tracing::debug!(key = %key, replaced, "Listener registered");

        Subscription {
            registry: Arc::downgrade(&self.inner),
            key,
            generation,
            released: false,
        }
    }

    /// Register `listener` under a freshly generated id
    pub fn add_listener(&self, listener: Listener) -> Subscription {
        self.subscribe(format!("listener-{}", Uuid::new_v4()), listener)
    }

    /// Remove the registration under `(kind, listener_id)`; unknown keys are ignored
    pub fn unsubscribe(&self, kind: EventKind, listener_id: &str) -> bool {
        let key = ListenerKey::new(kind, listener_id);
        let removed = self.inner.listeners.remove(&key).is_some();
        if removed {
            tracing::debug!(key = %key, "Listener removed");
        }
        removed
    }

    /// Hand `event` to every listener registered for its kind
    ///
    /// Listeners run on the caller's task, outside the table's locks, so a
    /// listener may itself subscribe or unsubscribe. Returns how many ran.
    pub fn dispatch(&self, event: &RemoteEvent) -> usize {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .iter()
            .filter(|entry| entry.key().kind == kind)
            .map(|entry| entry.value().listener.clone())
            .collect();

        let delivered = listeners.iter().filter(|l| l.deliver(event)).count();
        tracing::trace!(event = event.name(), delivered, "Event dispatched");
        delivered
    }

    pub fn contains(&self, kind: EventKind, listener_id: &str) -> bool {
        self.inner
            .listeners
            .contains_key(&ListenerKey::new(kind, listener_id))
    }

    pub fn len(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.listeners.is_empty()
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.inner.listeners.clear();
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Guard for one registration
///
/// Releasing (explicitly or on drop) removes the registration only if it is
/// still the one this guard created.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    registry: Weak<RegistryInner>,
    key: ListenerKey,
    generation: u64,
    released: bool,
}

impl Subscription {
    pub fn key(&self) -> &ListenerKey {
        &self.key
    }

    /// Whether the registry still holds this guard's registration
    pub fn is_active(&self) -> bool {
        !self.released
            && self.registry.upgrade().is_some_and(|inner| {
                inner
                    .listeners
                    .get(&self.key)
                    .is_some_and(|r| r.generation == self.generation)
            })
    }

    /// Remove the registration now. Returns whether anything was removed.
    pub fn release(mut self) -> bool {
        self.release_inner()
    }

    fn release_inner(&mut self) -> bool {
        if std::mem::replace(&mut self.released, true) {
            return false;
        }
        let Some(inner) = self.registry.upgrade() else {
            return false;
        };

        let generation = self.generation;
        let removed = inner
            .listeners
            .remove_if(&self.key, |_, r| r.generation == generation)
            .is_some();

        if removed {
            tracing::debug!(key = %self.key, "Listener released");
        }
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .field("released", &self.released)
            .finish()
    }
}
