//! SQLite user repository.
//!
//! Stores accounts with a SHA-256 password digest (hashing happens at
//! the API boundary; this layer only ever sees the digest).

use natter_core::repository::user::UserRepository;
use natter_types::error::RepositoryError;
use natter_types::user::User;
use sqlx::Row;

use super::{is_unique_violation, map_sqlx_error};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        username: row.try_get("username").map_err(map_sqlx_error)?,
        profile_pic: row.try_get("profile_pic").map_err(map_sqlx_error)?,
    })
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(done) => Ok(User {
                id: done.last_insert_rowid(),
                username: username.to_string(),
                profile_pic: None,
            }),
            Err(err) if is_unique_violation(&err) => Err(RepositoryError::Conflict(format!(
                "username '{username}' already exists"
            ))),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, username, profile_pic FROM users WHERE username = ? AND password_hash = ?",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn user_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.is_some())
    }

    async fn set_profile_pic(
        &self,
        username: &str,
        profile_pic: &str,
    ) -> Result<User, RepositoryError> {
        let result = sqlx::query("UPDATE users SET profile_pic = ? WHERE username = ?")
            .bind(profile_pic)
            .bind(username)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query("SELECT id, username, profile_pic FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        user_from_row(&row)
    }

    async fn profile_pic(&self, username: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT profile_pic FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepositoryError::NotFound)?;

        row.try_get("profile_pic").map_err(map_sqlx_error)
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
    async fn test_create_and_authenticate() {
        let repo = SqliteUserRepository::new(test_pool().await);

        let user = repo.create_user("alice", "digest-a").await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");

        let found = repo.find_by_credentials("alice", "digest-a").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");

        let wrong = repo.find_by_credentials("alice", "digest-b").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflict() {
        let repo = SqliteUserRepository::new(test_pool().await);

        repo.create_user("alice", "digest").await.unwrap();
        let err = repo.create_user("alice", "other").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_user_exists() {
        let repo = SqliteUserRepository::new(test_pool().await);

        repo.create_user("alice", "digest").await.unwrap();
        assert!(repo.user_exists("alice").await.unwrap());
        assert!(!repo.user_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_profile_pic_roundtrip() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create_user("alice", "digest").await.unwrap();

        assert_eq!(repo.profile_pic("alice").await.unwrap(), None);

        let user = repo.set_profile_pic("alice", "base64-data").await.unwrap();
        assert_eq!(user.profile_pic.as_deref(), Some("base64-data"));

        let pic = repo.profile_pic("alice").await.unwrap();
        assert_eq!(pic.as_deref(), Some("base64-data"));
    }

    #[tokio::test]
    async fn test_profile_pic_unknown_user() {
        let repo = SqliteUserRepository::new(test_pool().await);

        let err = repo.set_profile_pic("ghost", "pic").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let err = repo.profile_pic("ghost").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
