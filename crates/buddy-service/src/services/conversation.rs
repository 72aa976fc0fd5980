//! Conversation store
//!
//! Per-partner message history. History is fetched from the remote, grows
//! with confirmed sends, and with incoming messages while the partner is open.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use buddy_core::{is_blank, Message};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::events::{Listener, Subscription};

use super::context::ChatContext;
use super::error::{ServiceError, ServiceResult};
use super::page_limit;

/// Listener id used while a conversation with `partner` is open
pub fn message_listener_id(partner: &str) -> String {
    format!("MESSAGE_LISTENER_{partner}")
}

#[derive(Debug, Default)]
struct Histories {
    by_partner: HashMap<String, Vec<Message>>,
}

impl Histories {
    fn replace(&mut self, partner: &str, messages: Vec<Message>) {
        self.by_partner.insert(partner.to_string(), messages);
    }

    fn len(&self, partner: &str) -> usize {
        self.by_partner.get(partner).map_or(0, Vec::len)
    }

    /// Replace the history with `fetched`, keeping anything appended past `mark`
    fn merge(&mut self, partner: &str, fetched: Vec<Message>, mark: usize) -> Vec<Message> {
        let received = self
            .by_partner
            .get(partner)
            .and_then(|history| history.get(mark..))
            .map(<[Message]>::to_vec)
            .unwrap_or_default();

        let mut merged = fetched;
        for message in received {
            if !merged.iter().any(|m| m.id == message.id) {
                merged.push(message);
            }
        }
        self.by_partner.insert(partner.to_string(), merged.clone());
        merged
    }

    /// Append unless a message with the same id is already there
    fn append(&mut self, partner: &str, message: &Message) -> bool {
        let history = self.by_partner.entry(partner.to_string()).or_default();
        if history.iter().any(|m| m.id == message.id) {
            return false;
        }
        history.push(message.clone());
        true
    }

    fn get(&self, partner: &str) -> Vec<Message> {
        self.by_partner.get(partner).cloned().unwrap_or_default()
    }
}

struct Active {
    partner: String,
    _subscription: Subscription,
}

/// Message history keyed by partner uid
pub struct ConversationStore {
    ctx: ChatContext,
    histories: Arc<Mutex<Histories>>,
    active: Mutex<Option<Active>>,
}

impl ConversationStore {
    pub fn new(ctx: &ChatContext) -> Self {
        Self {
            ctx: ctx.clone(),
            histories: Arc::new(Mutex::new(Histories::default())),
            active: Mutex::new(None),
        }
    }

    /// Load the most recent messages with `partner`, oldest first
    ///
    /// The result replaces the locally held history for `partner`.
    #[instrument(skip(self))]
    pub async fn fetch_history(&self, partner: &str, limit: Option<u32>) -> ServiceResult<Vec<Message>> {
        let messages = self.load(partner, limit).await?;
        self.histories.lock().replace(partner, messages.clone());

        Ok(messages)
    }

    async fn load(&self, partner: &str, limit: Option<u32>) -> ServiceResult<Vec<Message>> {
        let limit = page_limit(limit, self.ctx.chat_config().history_limit);

        let mut messages = self
            .ctx
            .remote()
            .fetch_messages(partner, limit)
            .await
            .map_err(|err| {
                warn!(partner, error = %err, "Failed to fetch messages");
                ServiceError::Fetch(err)
            })?;

        // Remote pages come newest first
        messages.reverse();
        messages.sort_by_key(|m| m.sent_at);

        debug!(partner, count = messages.len(), "History loaded");
        Ok(messages)
    }

    /// Send `text` to `partner`
    ///
    /// Returns `Ok(None)` without contacting the remote when there is no
    /// partner or nothing to send. Otherwise `text` is sent as given. The message is added to the history only
    /// once the remote has confirmed it.
    #[instrument(skip(self, text))]
    pub async fn send(&self, partner: Option<&str>, text: &str) -> ServiceResult<Option<Message>> {
        let Some(partner) = partner.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        if is_blank(text) {
            return Ok(None);
        }

        let message = self
            .ctx
            .remote()
            .send_message(partner, text)
            .await
            .map_err(|err| {
                warn!(partner, error = %err, "Failed to send message");
                ServiceError::Send(err)
            })?;

        self.histories.lock().append(partner, &message);
        debug!(partner, id = %message.id, "Message sent");

        Ok(Some(message))
    }

    /// Make `partner` the open conversation
    ///
    /// Starts listening for incoming messages from the conversation, then
    /// loads the history with the default limit. Messages received while the
    /// history is loading are kept after the fetched page. Any previously open
    /// conversation stops listening.
    #[instrument(skip(self))]
    pub async fn open(&self, partner: &str) -> ServiceResult<Vec<Message>> {
        let mark = self.histories.lock().len(partner);
        let subscription = self
            .ctx
            .registry()
            .subscribe(message_listener_id(partner), self.listener(partner));

        let fetched = match self.load(partner, None).await {
            Ok(fetched) => fetched,
            Err(err) => {
                drop(subscription);
                let mut active = self.active.lock();
                if active.as_ref().is_some_and(|a| a.partner == partner) {
                    *active = None;
                }
                return Err(err);
            }
        };
        let history = self.histories.lock().merge(partner, fetched, mark);

        let previous = self.active.lock().replace(Active {
            partner: partner.to_string(),
            _subscription: subscription,
        });
        if let Some(previous) = previous {
            debug!(partner = %previous.partner, "Conversation closed");
        }

        info!(partner, "Conversation opened");
        Ok(history)
    }

    /// Stop listening for the open conversation; history is kept
    pub fn close(&self) {
        if let Some(active) = self.active.lock().take() {
            info!(partner = %active.partner, "Conversation closed");
        }
    }

    pub fn active_partner(&self) -> Option<String> {
        self.active.lock().as_ref().map(|a| a.partner.clone())
    }

    /// Locally held history with `partner`
    pub fn history(&self, partner: &str) -> Vec<Message> {
        self.histories.lock().get(partner)
    }

    fn listener(&self, partner: &str) -> Listener {
        let histories: Weak<Mutex<Histories>> = Arc::downgrade(&self.histories);
        let partner = partner.to_string();

        Listener::message(move |message: &Message| {
            if !message.belongs_to(&partner) {
                return;
            }
            let Some(histories) = histories.upgrade() else {
                return;
            };
            if histories.lock().append(&partner, message) {
                trace!(partner = %partner, id = %message.id, "Message received");
            } else {
                trace!(partner = %partner, id = %message.id, "Duplicate message skipped");
            }
        })
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("active_partner", &self.active_partner())
            .field("histories", &self.histories.lock().by_partner.len())
            .finish()
    }
}
