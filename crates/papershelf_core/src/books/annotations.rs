use crate::books::errors::BookError;
use crate::books::repository::BookRepository;
use crate::books::types::{
    BookId, DEFAULT_HIGHLIGHT_COLOR, Highlight, NewHighlight, NewNote, Note,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Builds annotation records and delegates the append to the repository.
/// Annotation ids are freshly generated UUIDs, unrelated to the book
/// identifier scheme.
pub struct AnnotationManager<R> {
    repository: Arc<R>,
}

impl<R: BookRepository> AnnotationManager<R> {
    #[must_use]
    #[inline]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Build a note from caller-supplied fields and append it.
    /// # Errors
    /// Propagates the repository failure; nothing is created on error.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn add_note(&self, id: BookId, request: NewNote) -> Result<Note, BookError> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            page: request.page,
            text: request.text,
            created_at: request.created_at.unwrap_or_else(Utc::now),
        };
        self.repository.append_note(id, &note).await?;

        log::info!("Added note {} to book {id}", note.id);
        Ok(note)
    }

    /// Build a highlight, defaulting the color when the caller supplies none,
    /// and append it.
    /// # Errors
    /// Propagates the repository failure; nothing is created on error.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn add_highlight(
        &self,
        id: BookId,
        request: NewHighlight,
    ) -> Result<Highlight, BookError> {
        let highlight = Highlight {
            id: Uuid::new_v4().to_string(),
            page: request.page,
            text: request.text,
            color: request
                .color
                .unwrap_or_else(|| DEFAULT_HIGHLIGHT_COLOR.to_owned()),
            created_at: request.created_at.unwrap_or_else(Utc::now),
        };
        self.repository.append_highlight(id, &highlight).await?;

        log::info!("Added highlight {} to book {id}", highlight.id);
        Ok(highlight)
    }
}
