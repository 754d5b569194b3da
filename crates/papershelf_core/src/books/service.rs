use crate::books::annotations::AnnotationManager;
use crate::books::errors::BookError;
use crate::books::progress;
use crate::books::repository::BookRepository;
use crate::books::types::{
    Book, BookId, BookUpdate, Highlight, NewBook, NewHighlight, NewNote, Note, ProgressUpdate,
};
use crate::storage::client::ObjectStorage;
use std::sync::Arc;

/// Largest accepted upload. Anything beyond this fails validation before any
/// side effect.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Orchestrates the book lifecycle: validates input, delegates binary content
/// to the object store and metadata to the repository, and returns either the
/// finished book or one taxonomy error.
pub struct BookService<R, S> {
    repository: Arc<R>,
    storage: S,
    annotations: AnnotationManager<R>,
}

impl<R: BookRepository, S: ObjectStorage> BookService<R, S> {
    #[must_use]
    #[inline]
    pub fn new(repository: Arc<R>, storage: S) -> Self {
        Self {
            annotations: AnnotationManager::new(Arc::clone(&repository)),
            repository,
            storage,
        }
    }

    /// Validate the upload, store the binary, then persist the metadata with
    /// default reading state. Validation runs fully before either external
    /// call; first failure wins.
    ///
    /// A metadata-write failure after a successful upload leaves the blob
    /// orphaned in the object store. There is no compensating delete; the
    /// orphan is only logged.
    /// # Errors
    /// [`BookError::Validation`] for a missing title or file, a non-PDF
    /// filename, an empty file or one over [`MAX_UPLOAD_BYTES`];
    /// [`BookError::Storage`] / [`BookError::Persistence`] from the
    /// collaborators.
    #[allow(clippy::missing_inline_in_public_items, reason = "Large function")]
    pub async fn upload_book(
        &self,
        title: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Book, BookError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BookError::Validation("title required".to_owned()));
        }
        if filename.is_empty() {
            return Err(BookError::Validation("no file".to_owned()));
        }
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(BookError::Validation("only PDF allowed".to_owned()));
        }
        if bytes.is_empty() {
            return Err(BookError::Validation("empty file".to_owned()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(BookError::Validation("too large".to_owned()));
        }

        let extension = filename.rsplit('.').next().unwrap_or("pdf").to_lowercase();
        let file_url = self.storage.upload(bytes, &extension).await?;

        let draft = NewBook {
            title: title.to_owned(),
            file_url,
        };
        match self.repository.create(draft).await {
            Ok(book) => {
                log::info!("Created book {} at {}", book.id, book.file_url);
                Ok(book)
            }
            Err(error) => {
                // Two-phase write gap: the blob stays behind with no cleanup
                log::warn!("Metadata write failed after upload, orphaned object remains: {error}");
                Err(error)
            }
        }
    }

    /// All books in insertion order.
    /// # Errors
    /// Fails only on store unavailability.
    #[inline]
    pub async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        self.repository.find_all().await
    }

    /// # Errors
    /// [`BookError::InvalidIdentifier`] before any store call,
    /// [`BookError::NotFound`] for a valid but absent id.
    #[inline]
    pub async fn get_book(&self, id_text: &str) -> Result<Book, BookError> {
        let id = BookId::parse(id_text)?;
        self.repository.find_by_id(id).await
    }

    /// Apply a partial update and return the refreshed book.
    /// # Errors
    /// [`BookError::Validation`] when the update sets no field.
    #[inline]
    pub async fn update_book(&self, id_text: &str, update: BookUpdate) -> Result<Book, BookError> {
        let id = BookId::parse(id_text)?;
        self.repository.update_fields(id, update).await
    }

    /// Compute the reading percentage for the given position and persist both
    /// the percentage and the last read page.
    /// # Errors
    /// [`BookError::InvalidIdentifier`] / [`BookError::NotFound`] as for any
    /// by-id operation.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn update_progress(
        &self,
        id_text: &str,
        current_page: i64,
        total_pages: i64,
    ) -> Result<ProgressUpdate, BookError> {
        let id = BookId::parse(id_text)?;
        let percentage = progress::compute(current_page, total_pages);
        let update = BookUpdate {
            reading_progress: Some(percentage),
            last_read_page: Some(current_page),
            ..BookUpdate::default()
        };
        self.repository.update_fields(id, update).await?;

        Ok(ProgressUpdate {
            progress: percentage,
            current_page,
        })
    }

    /// # Errors
    /// [`BookError::InvalidIdentifier`] before any mutation.
    #[inline]
    pub async fn add_note(&self, id_text: &str, request: NewNote) -> Result<Note, BookError> {
        let id = BookId::parse(id_text)?;
        self.annotations.add_note(id, request).await
    }

    /// # Errors
    /// [`BookError::InvalidIdentifier`] before any mutation.
    #[inline]
    pub async fn add_highlight(
        &self,
        id_text: &str,
        request: NewHighlight,
    ) -> Result<Highlight, BookError> {
        let id = BookId::parse(id_text)?;
        self.annotations.add_highlight(id, request).await
    }

    /// Remove the book document. The blob in the object store is not touched.
    /// # Errors
    /// [`BookError::NotFound`] when the id matched nothing, including a
    /// repeated delete.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn delete_book(&self, id_text: &str) -> Result<(), BookError> {
        let id = BookId::parse(id_text)?;
        if self.repository.delete(id).await? {
            log::info!("Deleted book {id}");
            Ok(())
        } else {
            Err(BookError::NotFound)
        }
    }
}
