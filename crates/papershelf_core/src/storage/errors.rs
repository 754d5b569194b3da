/// Custom error type for handling failures of the object-store client.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP client itself could not be constructed.
    #[error("failed to build object store HTTP client: {0}")]
    Client(reqwest::Error),

    /// Transport-level failure while talking to the store, originating from
    /// `reqwest`.
    #[error("object store transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("object store rejected the upload (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Upload precondition violated: there is nothing to store.
    #[error("refusing to upload an empty object")]
    EmptyObject,
}
