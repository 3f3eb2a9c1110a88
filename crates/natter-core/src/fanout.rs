//! Fan-out router: deliver one persisted message to every currently
//! connected recipient.
//!
//! The router only ever sees messages that are already durable. Delivery
//! is send-and-forget: there is no acknowledgement, retry, or queueing
//! for recipients who are offline at fan-out time -- they catch up later
//! from message history. One unreachable connection never blocks
//! delivery to the others.

use std::collections::HashSet;
use std::sync::Arc;

use natter_types::error::RepositoryError;
use natter_types::message::{DirectMessage, GroupMessage, OutboundMessage};
use tracing::{debug, warn};

use crate::presence::{ConnectionId, PresenceRegistry};

/// Transport-layer delivery capability.
///
/// Implemented by the WebSocket connection table. `emit` is best-effort:
/// it returns `false` for an already-closed or unknown handle, which the
/// router treats the same as "recipient currently offline". It must
/// never panic or block on a dead peer.
pub trait MessageSink: Send + Sync {
    fn emit(&self, handle: ConnectionId, payload: &OutboundMessage) -> bool;
}

impl<S: MessageSink + ?Sized> MessageSink for Arc<S> {
    fn emit(&self, handle: ConnectionId, payload: &OutboundMessage) -> bool {
        (**self).emit(handle, payload)
    }
}

/// Read-only view of group membership.
///
/// The router queries this fresh for every group message so fan-out
/// always reflects current membership, not membership at compose time.
/// Any caching layer here would be a behavioral change and needs its own
/// invalidation design.
pub trait GroupDirectory: Send + Sync {
    fn members_of(
        &self,
        group_id: i64,
    ) -> impl std::future::Future<Output = Result<HashSet<String>, RepositoryError>> + Send;
}

/// Routes persisted messages to live connections.
///
/// Reads the presence registry at the instant of fan-out; persistence
/// and fan-out deliberately run against independently-mutating registry
/// states ("deliver to whoever is online now", not "whoever was online
/// when the request arrived").
pub struct FanOutRouter<G, S> {
    presence: Arc<PresenceRegistry>,
    directory: G,
    sink: S,
}

impl<G: GroupDirectory, S: MessageSink> FanOutRouter<G, S> {
    pub fn new(presence: Arc<PresenceRegistry>, directory: G, sink: S) -> Self {
        Self {
            presence,
            directory,
            sink,
        }
    }

    /// Deliver a persisted direct message.
    ///
    /// The receiver gets the stored copy if online. The sender is echoed
    /// the same payload (their other live session, or the sending client
    /// itself, observes the authoritative copy with its assigned id and
    /// canonical timestamp) -- except for self-messages, which get
    /// exactly one delivery. Zero online recipients is a normal outcome.
    pub fn route_direct(&self, msg: &DirectMessage) {
        let payload = OutboundMessage::Direct(msg.clone());

        if let Some(handle) = self.presence.lookup(&msg.receiver) {
            self.deliver(handle, &payload, &msg.receiver);
        }
        if msg.sender != msg.receiver {
            if let Some(handle) = self.presence.lookup(&msg.sender) {
                self.deliver(handle, &payload, &msg.sender);
            }
        }
    }

    /// Deliver a persisted group message to every currently connected
    /// member.
    ///
    /// Membership is resolved fresh from the directory. The sender
    /// receives delivery through the same loop if and only if they are
    /// still a member and connected -- there is no separate sender echo
    /// on the group path. An unknown group resolves to an empty set; a
    /// directory read failure is logged and fans out to no one (the
    /// message is already durable either way).
    pub async fn route_group(&self, msg: &GroupMessage) {
        let members = match self.directory.members_of(msg.group_id).await {
            Ok(members) => members,
            Err(err) => {
                warn!(
                    group_id = msg.group_id,
                    message_id = msg.id,
                    error = %err,
                    "membership lookup failed, skipping fan-out"
                );
                return;
            }
        };

        let payload = OutboundMessage::Group(msg.clone());
        for member in &members {
            if let Some(handle) = self.presence.lookup(member) {
                self.deliver(handle, &payload, member);
            }
        }
    }

    fn deliver(&self, handle: ConnectionId, payload: &OutboundMessage, username: &str) {
        if !self.sink.emit(handle, payload) {
            // Equivalent to the recipient being offline; never escalated.
            debug!(%username, %handle, "connection unreachable, delivery dropped");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory fakes shared by the fan-out and service tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use natter_types::error::RepositoryError;
    use natter_types::message::OutboundMessage;

    use crate::presence::ConnectionId;

    use super::{GroupDirectory, MessageSink};

    /// Records every emit; handles listed in `dead` report failure.
    #[derive(Default)]
    pub struct RecordingSink {
        pub deliveries: Mutex<Vec<(ConnectionId, OutboundMessage)>>,
        pub dead: Mutex<HashSet<ConnectionId>>,
    }

    impl RecordingSink {
        pub fn delivered_to(&self) -> Vec<ConnectionId> {
            self.deliveries
                .lock()
                .unwrap()
                .iter()
                .map(|(handle, _)| *handle)
                .collect()
        }

        pub fn mark_dead(&self, handle: ConnectionId) {
            self.dead.lock().unwrap().insert(handle);
        }
    }

    impl MessageSink for RecordingSink {
        fn emit(&self, handle: ConnectionId, payload: &OutboundMessage) -> bool {
            if self.dead.lock().unwrap().contains(&handle) {
                return false;
            }
            self.deliveries
                .lock()
                .unwrap()
                .push((handle, payload.clone()));
            true
        }
    }

    /// Fixed group membership, with an optional poisoned group id that
    /// fails resolution.
    #[derive(Default)]
    pub struct StaticDirectory {
        pub groups: HashMap<i64, HashSet<String>>,
        pub failing: Option<i64>,
    }

    impl StaticDirectory {
        pub fn with_group(mut self, group_id: i64, members: &[&str]) -> Self {
            self.groups
                .insert(group_id, members.iter().map(|m| m.to_string()).collect());
            self
        }
    }

    impl GroupDirectory for StaticDirectory {
        async fn members_of(&self, group_id: i64) -> Result<HashSet<String>, RepositoryError> {
            if self.failing == Some(group_id) {
                return Err(RepositoryError::Connection);
            }
            Ok(self.groups.get(&group_id).cloned().unwrap_or_default())
        }
    }
}
