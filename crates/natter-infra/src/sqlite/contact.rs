//! SQLite contact list repository.

use natter_core::repository::contact::ContactRepository;
use natter_types::error::RepositoryError;
use sqlx::Row;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ContactRepository`.
pub struct SqliteContactRepository {
    pool: DatabasePool,
}

impl SqliteContactRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ContactRepository for SqliteContactRepository {
    async fn add_contact(&self, username: &str, contact: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR IGNORE INTO contacts (username, contact) VALUES (?, ?)")
            .bind(username)
            .bind(contact)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn contacts_of(&self, username: &str) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT contact FROM contacts WHERE username = ? ORDER BY contact")
            .bind(username)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| row.try_get("contact").map_err(map_sqlx_error))
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

    #[tokio::test]
    async fn test_add_and_list_contacts() {
        let repo = SqliteContactRepository::new(test_pool().await);

        repo.add_contact("alice", "carol").await.unwrap();
        repo.add_contact("alice", "bob").await.unwrap();
        repo.add_contact("bob", "alice").await.unwrap();

        let contacts = repo.contacts_of("alice").await.unwrap();
        assert_eq!(contacts, vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn test_add_contact_idempotent() {
        let repo = SqliteContactRepository::new(test_pool().await);

        repo.add_contact("alice", "bob").await.unwrap();
        repo.add_contact("alice", "bob").await.unwrap();

        let contacts = repo.contacts_of("alice").await.unwrap();
        assert_eq!(contacts, vec!["bob"]);
    }

    #[tokio::test]
    async fn test_contacts_of_unknown_user_is_empty() {
        let repo = SqliteContactRepository::new(test_pool().await);
        assert!(repo.contacts_of("ghost").await.unwrap().is_empty());
    }
}
