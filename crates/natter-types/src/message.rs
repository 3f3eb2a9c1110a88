//! Direct and group message types.
//!
//! Messages are append-only: `id` is assigned by the message store at
//! persist time and never changes afterwards. The serialized form of
//! these structs is exactly what WebSocket clients receive -- there is
//! no additional envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-to-one message between two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    /// Store-assigned identifier, strictly increasing per table.
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A message addressed to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMessage {
    /// Store-assigned identifier, strictly increasing per table.
    pub id: i64,
    pub group_id: i64,
    pub sender: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Wire payload pushed to connected clients.
///
/// Untagged: a direct message serializes as
/// `{id, sender, receiver, text, timestamp}` and a group message as
/// `{id, group_id, sender, text, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Direct(DirectMessage),
    Group(GroupMessage),
}

impl From<DirectMessage> for OutboundMessage {
    fn from(msg: DirectMessage) -> Self {
        OutboundMessage::Direct(msg)
    }
}

impl From<GroupMessage> for OutboundMessage {
    fn from(msg: GroupMessage) -> Self {
        OutboundMessage::Group(msg)
    }
}
