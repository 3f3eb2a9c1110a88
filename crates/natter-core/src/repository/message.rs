//! Message store trait definition.
//!
//! The message store is append-only: inserts assign a strictly
//! increasing integer id per table and are durable before returning.
//! Messages are never mutated or deleted.
//!
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use chrono::{DateTime, Utc};
use natter_types::error::RepositoryError;
use natter_types::message::{DirectMessage, GroupMessage};

pub trait MessageRepository: Send + Sync {
    /// Persist a direct message and return the stored copy, including
    /// its assigned id.
    fn insert_direct(
        &self,
        sender: &str,
        receiver: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<DirectMessage, RepositoryError>> + Send;

    /// Persist a group message and return the stored copy, including
    /// its assigned id.
    fn insert_group(
        &self,
        group_id: i64,
        sender: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<GroupMessage, RepositoryError>> + Send;

    /// Conversation history between two users (both directions), oldest
    /// first.
    fn direct_history(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> impl std::future::Future<Output = Result<Vec<DirectMessage>, RepositoryError>> + Send;

    /// Message history for a group, oldest first.
    fn group_history(
        &self,
        group_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<GroupMessage>, RepositoryError>> + Send;
}
