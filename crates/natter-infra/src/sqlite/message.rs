//! SQLite message store.
//!
//! Implements `MessageRepository` from `natter-core` using sqlx with
//! split read/write pools. Both message tables are append-only; SQLite
//! assigns ids via `INTEGER PRIMARY KEY AUTOINCREMENT`, so ids are
//! strictly increasing per table. Writes go through the single-writer
//! pool and are durable before the insert returns.

use chrono::{DateTime, Utc};
use natter_core::repository::message::MessageRepository;
use natter_types::error::RepositoryError;
use natter_types::message::{DirectMessage, GroupMessage};
use sqlx::Row;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn direct_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DirectMessage, RepositoryError> {
    let timestamp: String = row.try_get("timestamp").map_err(map_sqlx_error)?;
    Ok(DirectMessage {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        sender: row.try_get("sender").map_err(map_sqlx_error)?,
        receiver: row.try_get("receiver").map_err(map_sqlx_error)?,
        text: row.try_get("text").map_err(map_sqlx_error)?,
        timestamp: parse_datetime(&timestamp)?,
    })
}

fn group_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<GroupMessage, RepositoryError> {
    let timestamp: String = row.try_get("timestamp").map_err(map_sqlx_error)?;
    Ok(GroupMessage {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        group_id: row.try_get("group_id").map_err(map_sqlx_error)?,
        sender: row.try_get("sender").map_err(map_sqlx_error)?,
        text: row.try_get("text").map_err(map_sqlx_error)?,
        timestamp: parse_datetime(&timestamp)?,
    })
}

impl MessageRepository for SqliteMessageRepository {
    async fn insert_direct(
        &self,
        sender: &str,
        receiver: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<DirectMessage, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO messages (sender, receiver, text, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(sender)
        .bind(receiver)
        .bind(text)
        .bind(timestamp.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(DirectMessage {
            id: result.last_insert_rowid(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            text: text.to_string(),
            timestamp,
        })
    }

    async fn insert_group(
        &self,
        group_id: i64,
        sender: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<GroupMessage, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO group_messages (group_id, sender, text, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(group_id)
        .bind(sender)
        .bind(text)
        .bind(timestamp.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(GroupMessage {
            id: result.last_insert_rowid(),
            group_id,
            sender: sender.to_string(),
            text: text.to_string(),
            timestamp,
        })
    }

    async fn direct_history(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Vec<DirectMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE (sender = ? AND receiver = ?) OR (sender = ? AND receiver = ?)
               ORDER BY timestamp ASC, id ASC"#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(direct_from_row).collect()
    }

    async fn group_history(&self, group_id: i64) -> Result<Vec<GroupMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM group_messages WHERE group_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(group_from_row).collect()
    }
}
