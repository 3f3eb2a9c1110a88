//! Messaging service: the ingress point for sends and connection
//! lifecycle events.
//!
//! Write-then-notify ordering is enforced here. A send persists the
//! message first; only a durably stored message reaches the fan-out
//! router, and a failed store write skips fan-out entirely. The caller
//! gets a success response as soon as persistence succeeds, independent
//! of anyone being online.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use natter_types::error::SendError;
use natter_types::message::{DirectMessage, GroupMessage};
use tracing::debug;

use crate::fanout::{FanOutRouter, GroupDirectory, MessageSink};
use crate::presence::{ConnectionId, PresenceRegistry};
use crate::repository::message::MessageRepository;

/// Orchestrates message persistence, fan-out, and presence lifecycle.
///
/// Generic over the message store, group directory, and transport sink
/// so the core never depends on natter-infra or the WebSocket layer.
pub struct MessagingService<M, G, S> {
    messages: M,
    router: FanOutRouter<G, S>,
    presence: Arc<PresenceRegistry>,
}

impl<M, G, S> MessagingService<M, G, S>
where
    M: MessageRepository,
    G: GroupDirectory,
    S: MessageSink,
{
    /// Wire the service. `presence` must be the same registry instance
    /// the router reads from.
    pub fn new(messages: M, presence: Arc<PresenceRegistry>, directory: G, sink: S) -> Self {
        let router = FanOutRouter::new(Arc::clone(&presence), directory, sink);
        Self {
            messages,
            router,
            presence,
        }
    }

    /// Access the message store (history reads).
    pub fn messages(&self) -> &M {
        &self.messages
    }

    /// Persist a direct message, fan it out, and return the stored copy.
    ///
    /// A missing `timestamp` is stamped with the current time; either
    /// way the persisted value is canonical and is what recipients see.
    pub async fn send_direct(
        &self,
        sender: &str,
        receiver: &str,
        text: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<DirectMessage, SendError> {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let msg = self
            .messages
            .insert_direct(sender, receiver, text, timestamp)
            .await?;

        self.router.route_direct(&msg);
        Ok(msg)
    }

    /// Persist a group message, fan it out to the group's current
    /// members, and return the stored copy.
    pub async fn send_group(
        &self,
        group_id: i64,
        sender: &str,
        text: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<GroupMessage, SendError> {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let msg = self
            .messages
            .insert_group(group_id, sender, text, timestamp)
            .await?;

        self.router.route_group(&msg).await;
        Ok(msg)
    }

    /// Handle a transport connect event.
    ///
    /// An anonymous session (no resolvable username) has nothing useful
    /// to register; that is a no-op, not an error.
    pub fn on_connect(&self, username: Option<&str>, handle: ConnectionId) {
        match username {
            Some(username) => self.presence.register(username, handle),
            None => debug!(%handle, "anonymous connection, presence not registered"),
        }
    }

    /// Handle a transport disconnect event.
    pub fn on_disconnect(&self, handle: ConnectionId) {
        self.presence.unregister(handle);
    }
}
