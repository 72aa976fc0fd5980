//! Directory service
//!
//! Lists the users known to the remote service.

use buddy_core::User;
use tracing::{instrument, warn};

use crate::dto::RosterEntry;

use super::context::ChatContext;
use super::error::{ServiceError, ServiceResult};
use super::page_limit;
use super::presence::PresenceTracker;

/// Directory service
pub struct DirectoryService<'a> {
    ctx: &'a ChatContext,
}

impl<'a> DirectoryService<'a> {
    /// Create a new DirectoryService
    pub fn new(ctx: &'a ChatContext) -> Self {
        Self { ctx }
    }

    /// Fetch one page of users in the remote's order
    ///
    /// `None` uses the configured page size.
    #[instrument(skip(self))]
    pub async fn list_users(&self, limit: Option<u32>) -> ServiceResult<Vec<User>> {
        let limit = page_limit(limit, self.ctx.chat_config().users_page_limit);

        self.ctx.remote().list_users(limit).await.map_err(|err| {
            warn!(error = %err, "Failed to fetch users");
            ServiceError::Fetch(err)
        })
    }

    /// Everyone except the logged-in user, with their presence
    #[instrument(skip(self, presence))]
    pub async fn roster(&self, presence: &PresenceTracker) -> ServiceResult<Vec<RosterEntry>> {
        let me = self.ctx.current_user();
        let users = self.list_users(None).await?;

        Ok(users
            .into_iter()
            .filter(|u| !me.as_ref().is_some_and(|me| u.is(&me.uid)))
            .map(|u| {
                let status = presence.status(&u.uid);
                RosterEntry::new(u, status)
            })
            .collect())
    }
}
