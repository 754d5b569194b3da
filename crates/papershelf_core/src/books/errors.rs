use crate::storage::errors::StorageError;

/// Error type shared by every book operation. The HTTP layer owns the
/// translation from these kinds to status codes; the core only distinguishes
/// the failure domains.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// Malformed input, detected before any side effect.
    #[error("{0}")]
    Validation(String),

    /// Identifier text that does not match the store's identifier format.
    /// Distinct from [`BookError::NotFound`]: the store is never consulted.
    #[error("invalid book identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Well-formed identifier, absent document.
    #[error("book not found")]
    NotFound,

    /// Object-store failure; aborts the enclosing operation.
    #[error("object storage error: {0}")]
    Storage(#[from] StorageError),

    /// Metadata-store failure.
    #[error("metadata store error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Wildcard for everything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<serde_json::Error> for BookError {
    #[inline]
    fn from(error: serde_json::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}
