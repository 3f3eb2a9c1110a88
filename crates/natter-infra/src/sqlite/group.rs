//! SQLite group repository and membership directory.
//!
//! Implements both `GroupRepository` (CRUD for the HTTP surface) and the
//! fan-out router's `GroupDirectory` seam. `members_of` reads straight
//! from the table on every call: fan-out must see current membership,
//! never a cached snapshot.

use std::collections::HashSet;

use natter_core::fanout::GroupDirectory;
use natter_core::repository::group::GroupRepository;
use natter_types::error::RepositoryError;
use natter_types::group::Group;
use sqlx::Row;

use super::{is_unique_violation, map_sqlx_error};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `GroupRepository` and `GroupDirectory`.
pub struct SqliteGroupRepository {
    pool: DatabasePool,
}

impl SqliteGroupRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl GroupRepository for SqliteGroupRepository {
    async fn create_group(
        &self,
        group_name: &str,
        members: &[String],
    ) -> Result<Group, RepositoryError> {
        let result = sqlx::query("INSERT INTO chat_groups (group_name) VALUES (?)")
            .bind(group_name)
            .execute(&self.pool.writer)
            .await;

        let group_id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(err) if is_unique_violation(&err) => {
                return Err(RepositoryError::Conflict(format!(
                    "group '{group_name}' already exists"
                )));
            }
            Err(err) => return Err(map_sqlx_error(err)),
        };

        // Duplicate member names collapse on the (group_id, username) key.
        for member in members {
            sqlx::query(
                "INSERT OR IGNORE INTO group_members (group_id, username) VALUES (?, ?)",
            )
            .bind(group_id)
            .bind(member)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;
        }

        Ok(Group {
            group_id,
            group_name: group_name.to_string(),
        })
    }

    async fn groups_for(&self, username: &str) -> Result<Vec<Group>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT g.group_id, g.group_name
               FROM chat_groups g
               JOIN group_members gm ON g.group_id = gm.group_id
               WHERE gm.username = ?
               ORDER BY g.group_name"#,
        )
        .bind(username)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                Ok(Group {
                    group_id: row.try_get("group_id").map_err(map_sqlx_error)?,
                    group_name: row.try_get("group_name").map_err(map_sqlx_error)?,
                })
            })
            .collect()
    }
}

impl GroupDirectory for SqliteGroupRepository {
    async fn members_of(&self, group_id: i64) -> Result<HashSet<String>, RepositoryError> {
        let rows = sqlx::query("SELECT username FROM group_members WHERE group_id = ?")
            .bind(group_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| row.try_get("username").map_err(map_sqlx_error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_users(pool: &DatabasePool, usernames: &[&str]) {
        for username in usernames {
            sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, 'digest')")
                .bind(username)
                .execute(&pool.writer)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_group_and_membership_snapshot() {
        let pool = test_pool().await;
        seed_users(&pool, &["alice", "bob", "carol"]).await;
        let repo = SqliteGroupRepository::new(pool);

        let group = repo
            .create_group(
                "weekend-plans",
                &["alice".to_string(), "bob".to_string(), "carol".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(group.group_id, 1);

        let members = repo.members_of(group.group_id).await.unwrap();
        assert_eq!(
            members,
            ["alice", "bob", "carol"].map(String::from).into_iter().collect()
        );
    }

    #[tokio::test]
    async fn test_create_group_collapses_duplicate_members() {
        let pool = test_pool().await;
        seed_users(&pool, &["alice"]).await;
        let repo = SqliteGroupRepository::new(pool);

        let group = repo
            .create_group("solo", &["alice".to_string(), "alice".to_string()])
            .await
            .unwrap();

        let members = repo.members_of(group.group_id).await.unwrap();
        assert_eq!(members.len(), 1);
    }

    #[tokio::test]
    async fn test_create_group_name_conflict() {
        let pool = test_pool().await;
        seed_users(&pool, &["alice"]).await;
        let repo = SqliteGroupRepository::new(pool);

        repo.create_group("dup", &["alice".to_string()]).await.unwrap();
        let err = repo
            .create_group("dup", &["alice".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_groups_for_user() {
        let pool = test_pool().await;
        seed_users(&pool, &["alice", "bob"]).await;
        let repo = SqliteGroupRepository::new(pool);

        repo.create_group("both", &["alice".to_string(), "bob".to_string()])
            .await
            .unwrap();
        repo.create_group("alice-only", &["alice".to_string()])
            .await
            .unwrap();

        let groups = repo.groups_for("bob").await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_name, "both");
    }

    #[tokio::test]
    async fn test_members_of_unknown_group_is_empty() {
        let repo = SqliteGroupRepository::new(test_pool().await);
        assert!(repo.members_of(99).await.unwrap().is_empty());
    }
}
