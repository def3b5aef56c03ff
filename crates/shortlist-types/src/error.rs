use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to shortlist operations.
#[derive(Debug, Error)]
pub enum ShortlistError {
    #[error("shortlist not found")]
    NotFound,

    /// Input rejected before any work was done; the message is user-facing.
    #[error("{0}")]
    Validation(String),

    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<RepositoryError> for ShortlistError {
    fn from(e: RepositoryError) -> Self {
        ShortlistError::StorageError(e.to_string())
    }
}

/// Errors from repository operations (used by trait definitions in shortlist-core).
///
/// A missing row is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_is_the_message() {
        let err = ShortlistError::Validation("Maximum 10 requirements allowed.".to_string());
        assert_eq!(err.to_string(), "Maximum 10 requirements allowed.");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_repository_error_maps_to_storage_error() {
        let err: ShortlistError = RepositoryError::Query("boom".into()).into();
        assert!(matches!(err, ShortlistError::StorageError(msg) if msg.contains("boom")));
    }
}
