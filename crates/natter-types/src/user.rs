//! User account type.

use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The password hash never leaves the storage layer; this type is safe
/// to serialize into API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Base64-encoded profile picture, if one has been uploaded.
    pub profile_pic: Option<String>,
}
