//! User repository trait definition.

use natter_types::error::RepositoryError;
use natter_types::user::User;

pub trait UserRepository: Send + Sync {
    /// Create a user. Returns `Conflict` if the username is taken.
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by username and password hash. `Ok(None)` means
    /// the credentials did not match any account.
    fn find_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Whether a username is registered.
    fn user_exists(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Store a profile picture. Returns `NotFound` for an unknown user.
    fn set_profile_pic(
        &self,
        username: &str,
        profile_pic: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Fetch a user's profile picture. Returns `NotFound` for an
    /// unknown user; `Ok(None)` means the user has no picture.
    fn profile_pic(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;
}
