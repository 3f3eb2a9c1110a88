//! Presence registry: which users currently hold a live connection.
//!
//! The registry is the only shared mutable state in the messaging core.
//! It maps a username to the handle of their most recently registered
//! connection. Every operation is individually atomic; callers on
//! concurrent tasks never observe a half-updated mapping.

use std::fmt;

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Opaque identifier for a live transport-layer session.
///
/// Handles are minted and owned by the transport layer (the WebSocket
/// connection table). The registry stores them by value and never
/// manages the underlying connection's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh handle.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// In-memory map from username to their current live connection.
///
/// At most one entry exists per username: a new connect for an
/// already-registered username replaces the prior entry
/// (last-writer-wins). Replacing an entry does not close or otherwise
/// touch the superseded connection.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: DashMap<String, ConnectionId>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Associate `username` with `handle`, overwriting any prior
    /// association for that username. No error conditions.
    pub fn register(&self, username: &str, handle: ConnectionId) {
        self.entries.insert(username.to_string(), handle);
        debug!(%username, %handle, "registered presence");
    }

    /// Remove the association for whichever username currently maps to
    /// `handle`, if any.
    ///
    /// A handle that matches no current entry is a silent no-op. This is
    /// the common case when a user connects twice and the older
    /// connection later disconnects: the username already points at the
    /// newer handle, and that entry must survive.
    pub fn unregister(&self, handle: ConnectionId) {
        self.entries.retain(|username, current| {
            if *current == handle {
                debug!(%username, %handle, "unregistered presence");
                false
            } else {
                true
            }
        });
    }

    /// Current handle for a username, or `None` if they are offline.
    pub fn lookup(&self, username: &str) -> Option<ConnectionId> {
        self.entries.get(username).map(|entry| *entry.value())
    }

    /// Number of users currently registered.
    pub fn online_count(&self) -> usize {
        self.entries.len()
    }
}
