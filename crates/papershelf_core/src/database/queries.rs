use crate::books::errors::BookError;
use crate::books::repository::BookRepository;
use crate::books::types::{Book, BookId, BookUpdate, Highlight, NewBook, Note};
use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;

const BOOK_COLUMNS: &str = "id, title, author, cover_url, file_url, status, \
     reading_progress, last_read_page, notes, highlights";

/// SQLite-backed metadata store. One row per book; the annotation arrays are
/// JSON columns so appends can stay single-statement.
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// # Errors
    /// Fails when the database cannot be opened or migrated.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at start of program"
    )]
    pub async fn init(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .foreign_keys(true)
            .create_if_missing(true)
            .filename(path);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }

    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at end of program"
    )]
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl BookRepository for Db {
    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn create(&self, draft: NewBook) -> Result<Book, BookError> {
        // Reading-state columns all have schema-level defaults
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO books (title, file_url) VALUES (?1, ?2) RETURNING id",
        )
        .bind(draft.title)
        .bind(draft.file_url)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(BookId::new(id)).await
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn find_all(&self) -> Result<Vec<Book>, BookError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn find_by_id(&self, id: BookId) -> Result<Book, BookError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(BookError::NotFound)
    }

    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Trait method, large function"
    )]
    async fn update_fields(&self, id: BookId, update: BookUpdate) -> Result<Book, BookError> {
        if update.is_empty() {
            return Err(BookError::Validation("no valid fields to update".to_owned()));
        }

        let BookUpdate {
            title,
            cover_url,
            author,
            status,
            reading_progress,
            last_read_page,
            notes,
            highlights,
        } = update;

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE books SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(title) = title {
                fields.push("title = ").push_bind_unseparated(title);
            }
            if let Some(cover_url) = cover_url {
                fields.push("cover_url = ").push_bind_unseparated(cover_url);
            }
            if let Some(author) = author {
                fields.push("author = ").push_bind_unseparated(author);
            }
            if let Some(status) = status {
                fields.push("status = ").push_bind_unseparated(status);
            }
            if let Some(reading_progress) = reading_progress {
                fields
                    .push("reading_progress = ")
                    .push_bind_unseparated(reading_progress);
            }
            if let Some(last_read_page) = last_read_page {
                fields
                    .push("last_read_page = ")
                    .push_bind_unseparated(last_read_page);
            }
            if let Some(notes) = notes {
                fields
                    .push("notes = ")
                    .push_bind_unseparated(serde_json::to_string(&notes)?);
            }
            if let Some(highlights) = highlights {
                fields
                    .push("highlights = ")
                    .push_bind_unseparated(serde_json::to_string(&highlights)?);
            }
        }
        builder.push(" WHERE id = ").push_bind(id.get());

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(BookError::NotFound);
        }

        self.find_by_id(id).await
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn append_note(&self, id: BookId, note: &Note) -> Result<(), BookError> {
        // Single-statement append, no read-modify-write of the document
        let result =
            sqlx::query("UPDATE books SET notes = json_insert(notes, '$[#]', json(?1)) WHERE id = ?2")
                .bind(serde_json::to_string(note)?)
                .bind(id.get())
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(BookError::NotFound);
        }

        Ok(())
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn append_highlight(&self, id: BookId, highlight: &Highlight) -> Result<(), BookError> {
        let result = sqlx::query(
            "UPDATE books SET highlights = json_insert(highlights, '$[#]', json(?1)) WHERE id = ?2",
        )
        .bind(serde_json::to_string(highlight)?)
        .bind(id.get())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(BookError::NotFound);
        }

        Ok(())
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn delete(&self, id: BookId) -> Result<bool, BookError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_db() -> Db {
        // A single connection, otherwise every pool checkout would get its
        // own empty in-memory database
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();

        Db { pool }
    }

    async fn insert(db: &Db, title: &str) -> Book {
        db.create(NewBook {
            title: title.to_owned(),
            file_url: format!("https://store.test/books/{title}.pdf"),
        })
        .await
        .unwrap()
    }

    fn note(text: &str) -> Note {
        Note {
            id: text.to_owned(),
            page: 1,
            text: text.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn created_book_gets_defaults_and_an_id() {
        let db = memory_db().await;

        let book = insert(&db, "Dune").await;

        assert!(book.id > 0);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "");
        assert_eq!(book.cover_url, "");
        assert_eq!(book.status, "All");
        assert_eq!(book.reading_progress, 0.0);
        assert_eq!(book.last_read_page, 0);
        assert_eq!(book.notes, Vec::new());
        assert_eq!(book.highlights, Vec::new());
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let db = memory_db().await;
        insert(&db, "first").await;
        insert(&db, "second").await;
        insert(&db, "third").await;

        let titles: Vec<String> = db
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();

        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn absent_id_is_not_found() {
        let db = memory_db().await;

        let result = db.find_by_id(BookId::new(999)).await;

        assert!(matches!(result, Err(BookError::NotFound)));
    }

    #[tokio::test]
    async fn update_touches_only_the_named_fields() {
        let db = memory_db().await;
        let book = insert(&db, "Dune").await;
        db.append_note(BookId::new(book.id), &note("keep me"))
            .await
            .unwrap();

        let update = BookUpdate {
            title: Some("New".to_owned()),
            ..BookUpdate::default()
        };
        let refreshed = db.update_fields(BookId::new(book.id), update).await.unwrap();

        assert_eq!(refreshed.title, "New");
        assert_eq!(refreshed.file_url, book.file_url);
        assert_eq!(refreshed.status, book.status);
        assert_eq!(refreshed.reading_progress, book.reading_progress);
        assert_eq!(refreshed.notes.len(), 1);
    }

    #[tokio::test]
    async fn empty_update_fails_before_touching_the_store() {
        let db = memory_db().await;
        let book = insert(&db, "Dune").await;

        let result = db
            .update_fields(BookId::new(book.id), BookUpdate::default())
            .await;

        assert!(matches!(result, Err(BookError::Validation(_))));
    }

    #[tokio::test]
    async fn update_of_an_absent_book_is_not_found() {
        let db = memory_db().await;

        let update = BookUpdate {
            title: Some("New".to_owned()),
            ..BookUpdate::default()
        };
        let result = db.update_fields(BookId::new(999), update).await;

        assert!(matches!(result, Err(BookError::NotFound)));
    }

    #[tokio::test]
    async fn whole_array_replacement_through_the_update_path() {
        let db = memory_db().await;
        let book = insert(&db, "Dune").await;
        db.append_note(BookId::new(book.id), &note("old")).await.unwrap();

        let update = BookUpdate {
            notes: Some(vec![note("a"), note("b")]),
            ..BookUpdate::default()
        };
        let refreshed = db.update_fields(BookId::new(book.id), update).await.unwrap();

        let texts: Vec<&str> = refreshed.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn appended_notes_accumulate_in_order() {
        let db = memory_db().await;
        let book = insert(&db, "Dune").await;
        let id = BookId::new(book.id);

        db.append_note(id, &note("first")).await.unwrap();
        db.append_note(id, &note("second")).await.unwrap();

        let stored = db.find_by_id(id).await.unwrap();
        let texts: Vec<&str> = stored.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(stored.highlights.is_empty());
    }

    #[tokio::test]
    async fn appending_a_highlight_leaves_notes_alone() {
        let db = memory_db().await;
        let book = insert(&db, "Dune").await;
        let id = BookId::new(book.id);
        db.append_note(id, &note("a note")).await.unwrap();

        let highlight = Highlight {
            id: "h1".to_owned(),
            page: 4,
            text: "quote".to_owned(),
            color: "#ffff00".to_owned(),
            created_at: Utc::now(),
        };
        db.append_highlight(id, &highlight).await.unwrap();

        let stored = db.find_by_id(id).await.unwrap();
        assert_eq!(stored.notes.len(), 1);
        assert_eq!(stored.highlights, vec![highlight]);
    }

    #[tokio::test]
    async fn appending_to_an_absent_book_is_not_found() {
        let db = memory_db().await;

        let result = db.append_note(BookId::new(999), &note("x")).await;

        assert!(matches!(result, Err(BookError::NotFound)));
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_matched() {
        let db = memory_db().await;
        let book = insert(&db, "Dune").await;
        let id = BookId::new(book.id);

        assert!(db.delete(id).await.unwrap());
        assert!(!db.delete(id).await.unwrap());
    }
}
