//! Group repository trait definition.
//!
//! Membership reads used by the fan-out router go through the narrower
//! [`GroupDirectory`](crate::fanout::GroupDirectory) seam; this trait
//! covers group CRUD for the HTTP surface.

use natter_types::error::RepositoryError;
use natter_types::group::Group;

pub trait GroupRepository: Send + Sync {
    /// Create a group with the given members. Duplicate members are
    /// ignored. Returns `Conflict` if the name is taken.
    fn create_group(
        &self,
        group_name: &str,
        members: &[String],
    ) -> impl std::future::Future<Output = Result<Group, RepositoryError>> + Send;

    /// All groups a user belongs to.
    fn groups_for(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Group>, RepositoryError>> + Send;
}
