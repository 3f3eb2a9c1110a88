//! Group chat type.

use serde::{Deserialize, Serialize};

/// A named group chat.
///
/// Membership lives in its own table and is resolved through the
/// `GroupDirectory` seam at fan-out time, so it is deliberately not
/// carried on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: i64,
    pub group_name: String,
}
