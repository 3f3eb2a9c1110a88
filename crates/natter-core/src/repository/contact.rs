//! Contact list repository trait definition.

use natter_types::error::RepositoryError;

pub trait ContactRepository: Send + Sync {
    /// Add `contact` to `username`'s contact list (idempotent).
    fn add_contact(
        &self,
        username: &str,
        contact: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All contacts of a user, alphabetically.
    fn contacts_of(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
