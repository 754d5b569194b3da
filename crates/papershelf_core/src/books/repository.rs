use crate::books::errors::BookError;
use crate::books::types::{Book, BookId, BookUpdate, Highlight, NewBook, Note};
use async_trait::async_trait;

/// Capability over the metadata store. The service depends on this
/// abstraction instead of a process-wide client, so tests can substitute an
/// in-memory fake.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new document with default reading state and return the stored
    /// book, including its store-assigned id.
    async fn create(&self, draft: NewBook) -> Result<Book, BookError>;

    /// All stored books in insertion order.
    async fn find_all(&self) -> Result<Vec<Book>, BookError>;

    /// # Errors
    /// [`BookError::NotFound`] for a well-formed but absent id.
    async fn find_by_id(&self, id: BookId) -> Result<Book, BookError>;

    /// Apply a set-semantics update (last-writer-wins per field) and return
    /// the refreshed book.
    /// # Errors
    /// [`BookError::Validation`] when no field of `update` is set, before any
    /// store call; [`BookError::NotFound`] when nothing matched.
    async fn update_fields(&self, id: BookId, update: BookUpdate) -> Result<Book, BookError>;

    /// Atomically append one note to the book's `notes` array, without
    /// rewriting the rest of the document.
    async fn append_note(&self, id: BookId, note: &Note) -> Result<(), BookError>;

    /// Atomically append one highlight to the book's `highlights` array.
    async fn append_highlight(&self, id: BookId, highlight: &Highlight) -> Result<(), BookError>;

    /// Remove the document. `false` when no document matched.
    async fn delete(&self, id: BookId) -> Result<bool, BookError>;
}
