//! Connection table: the transport layer's ownership of live sessions.
//!
//! Each WebSocket connection attaches here and gets a fresh
//! `ConnectionId` plus the receiving end of an unbounded mailbox. The
//! table implements [`MessageSink`], so the fan-out router can emit to a
//! handle without knowing anything about WebSockets. Emitting to a
//! detached or closed connection reports `false` -- the router treats
//! that exactly like an offline recipient.

use dashmap::DashMap;
use natter_core::fanout::MessageSink;
use natter_core::presence::ConnectionId;
use natter_types::message::OutboundMessage;
use tokio::sync::mpsc;
use tracing::warn;

/// Live connections keyed by handle.
///
/// The presence registry references these handles but never manages
/// them; attach/detach is driven solely by the WebSocket task.
#[derive(Debug, Default)]
pub struct ConnectionTable {
    entries: DashMap<ConnectionId, mpsc::UnboundedSender<String>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register a new connection. Returns its handle and the mailbox the
    /// WebSocket task drains into the socket.
    pub fn attach(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let handle = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.entries.insert(handle, tx);
        (handle, rx)
    }

    /// Drop a connection. Safe to call for an already-detached handle.
    pub fn detach(&self, handle: ConnectionId) {
        self.entries.remove(&handle);
    }
}

impl MessageSink for ConnectionTable {
    fn emit(&self, handle: ConnectionId, payload: &OutboundMessage) -> bool {
        let Some(sender) = self.entries.get(&handle) else {
            return false;
        };

        let frame = match serde_json::to_string(payload) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "failed to serialize outbound message");
                return false;
            }
        };

        // A send error means the WebSocket task already went away; the
        // stale entry gets cleaned up by that task's detach.
        sender.send(frame).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use natter_types::message::DirectMessage;

    fn payload() -> OutboundMessage {
        OutboundMessage::Direct(DirectMessage {
            id: 1,
            sender: "alice".to_string(),
            receiver: "bob".to_string(),
            text: "hello".to_string(),
            timestamp: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_emit_delivers_json_frame() {
        let table = ConnectionTable::new();
        let (handle, mut rx) = table.attach();

        assert!(table.emit(handle, &payload()));

        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["sender"], "alice");
        assert_eq!(value["receiver"], "bob");
    }

    #[tokio::test]
    async fn test_emit_to_detached_handle_reports_unreachable() {
        let table = ConnectionTable::new();
        let (handle, _rx) = table.attach();
        table.detach(handle);

        assert!(!table.emit(handle, &payload()));
    }

    #[tokio::test]
    async fn test_emit_to_dropped_receiver_reports_unreachable() {
        let table = ConnectionTable::new();
        let (handle, rx) = table.attach();
        drop(rx);

        assert!(!table.emit(handle, &payload()));
    }
}
