use thiserror::Error;

/// Errors from repository operations (used by trait definitions in natter-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the send operations.
///
/// Delivery itself never produces an error: an unreachable recipient is
/// handled locally by the fan-out router. The only fatal failure is the
/// store write, in which case no fan-out happens at all.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message could not be persisted. Fan-out was skipped.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for SendError {
    fn from(err: RepositoryError) -> Self {
        SendError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Conflict("username 'alice' already exists".to_string());
        assert_eq!(
            err.to_string(),
            "conflict: username 'alice' already exists"
        );
    }

    #[test]
    fn test_send_error_from_repository_error() {
        let err = SendError::from(RepositoryError::Query("disk I/O error".to_string()));
        assert_eq!(err.to_string(), "persistence error: query error: disk I/O error");
    }
}
