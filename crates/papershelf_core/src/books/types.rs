use crate::books::errors::BookError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default `status` label assigned to every freshly uploaded book. The label is
/// free-form and never constrained to an enumeration by the store.
pub const DEFAULT_STATUS: &str = "All";

/// Color assigned to a highlight when the caller does not supply one.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff00";

/// Store-assigned identifier of a [`Book`].
///
/// The identifier format (a positive integer) is validable independently of
/// existence: malformed text fails with [`BookError::InvalidIdentifier`]
/// before any store call, while a well-formed but absent id yields
/// [`BookError::NotFound`] from the lookup itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(i64);

impl BookId {
    /// Wrap an identifier the store itself assigned.
    #[must_use]
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Validate untrusted identifier text.
    /// # Errors
    /// Fails with [`BookError::InvalidIdentifier`] when the text does not
    /// parse as a positive integer.
    #[inline]
    pub fn parse(text: &str) -> Result<Self, BookError> {
        match text.trim().parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(Self(raw)),
            Ok(_) | Err(_) => Err(BookError::InvalidIdentifier(text.to_owned())),
        }
    }

    #[must_use]
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for BookId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The central entity: metadata plus binary reference for one PDF in the
/// library. The metadata store owns this document; the binary itself lives in
/// the object store and is only referenced through `file_url`.
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Book {
    /// Store-assigned identifier, immutable after creation.
    pub id: i64,
    /// Non-empty title, trimmed of surrounding whitespace at creation.
    pub title: String,
    pub author: String,
    pub cover_url: String,
    /// Public URL of the stored binary, set at creation.
    pub file_url: String,
    /// Free-form reading status label, defaults to [`DEFAULT_STATUS`].
    pub status: String,
    /// Percentage, deliberately not clamped to `[0, 100]`.
    pub reading_progress: f64,
    pub last_read_page: i64,
    /// Append-only through the public contract, insertion order preserved.
    #[sqlx(json)]
    pub notes: Vec<Note>,
    /// Append-only through the public contract, insertion order preserved.
    #[sqlx(json)]
    pub highlights: Vec<Highlight>,
}

/// A free-form note attached to a book at a given page. Note ids are UUIDs,
/// unrelated to the book identifier scheme.
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub page: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A highlighted passage attached to a book at a given page.
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Highlight {
    pub id: String,
    pub page: i64,
    pub text: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Initial fields for a book insert; every reading-state field starts at its
/// default.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub file_url: String,
}

/// Caller-supplied note fields; `created_at` defaults to now when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
    pub page: i64,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Caller-supplied highlight fields; `color` defaults to
/// [`DEFAULT_HIGHLIGHT_COLOR`] and `created_at` to now when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHighlight {
    pub page: i64,
    pub text: String,
    pub color: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update request for a book. Each field is individually optional and
/// only the set fields are written (last-writer-wins per field). Unknown JSON
/// keys are dropped during deserialization, which replaces the string-keyed
/// field whitelist of earlier revisions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub cover_url: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub reading_progress: Option<f64>,
    pub last_read_page: Option<i64>,
    pub notes: Option<Vec<Note>>,
    pub highlights: Option<Vec<Highlight>>,
}

impl BookUpdate {
    /// `true` when no field is set; such an update is rejected before any
    /// store call.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.cover_url.is_none()
            && self.author.is_none()
            && self.status.is_none()
            && self.reading_progress.is_none()
            && self.last_read_page.is_none()
            && self.notes.is_none()
            && self.highlights.is_none()
    }
}

/// Result of a progress update, echoed back to the caller.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub progress: f64,
    pub current_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_identifier_text_parses() {
        let id = BookId::parse("42").unwrap();

        assert_eq!(id.get(), 42);
    }

    #[test]
    fn malformed_identifier_text_is_rejected() {
        for text in ["not-an-id", "", "12.5", "0", "-3"] {
            assert!(matches!(
                BookId::parse(text),
                Err(BookError::InvalidIdentifier(_))
            ));
        }
    }

    #[test]
    fn unknown_update_keys_are_dropped() {
        let update: BookUpdate =
            serde_json::from_str(r#"{"unknown_field": 1, "file_url": "x"}"#).unwrap();

        assert!(update.is_empty());
    }

    #[test]
    fn known_update_keys_are_kept() {
        let update: BookUpdate =
            serde_json::from_str(r#"{"title": "New", "unknown_field": 1}"#).unwrap();

        assert_eq!(update.title.as_deref(), Some("New"));
        assert!(update.cover_url.is_none());
        assert!(!update.is_empty());
    }
}
