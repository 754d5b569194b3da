use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use papershelf_core::books::errors::BookError;
use papershelf_core::books::types::{Book, BookUpdate, NewHighlight, NewNote};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Body limit above the 50 MiB upload cap, so the size rule in the service
/// produces the documented 400 instead of a framework-level rejection.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/all", get(list_books_legacy))
        .route("/books/upload", post(upload_book))
        .route(
            "/books/{id}",
            get(get_book)
                .patch(update_book)
                .put(update_book)
                .delete(delete_book),
        )
        .route("/books/{id}/progress", post(update_progress))
        .route("/books/{id}/notes", post(add_note))
        .route("/books/{id}/highlights", post(add_highlight))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.service.list_books().await?))
}

/// Legacy listing kept for older clients that still expect the document store
/// key under `_id`.
async fn list_books_legacy(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let books = state.service.list_books().await?;
    let legacy = books
        .into_iter()
        .map(to_legacy)
        .collect::<Result<Vec<_>, BookError>>()?;

    Ok(Json(legacy))
}

fn to_legacy(book: Book) -> Result<Value, BookError> {
    let mut value = serde_json::to_value(book)?;
    if let Value::Object(fields) = &mut value {
        if let Some(id) = fields.remove("id") {
            fields.insert("_id".to_owned(), id);
        }
    }

    Ok(value)
}

async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.service.get_book(&id).await?))
}

async fn upload_book(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut title = String::new();
    let mut filename = String::new();
    let mut bytes = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => title = field.text().await.map_err(bad_multipart)?,
            "file" => {
                filename = field.file_name().unwrap_or_default().to_owned();
                bytes = field.bytes().await.map_err(bad_multipart)?.to_vec();
            }
            _ => {}
        }
    }

    let book = state.service.upload_book(&title, &filename, &bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Book uploaded",
            "file_url": book.file_url,
            "id": book.id,
        })),
    ))
}

fn bad_multipart(error: MultipartError) -> ApiError {
    ApiError::from(BookError::Validation(error.to_string()))
}

async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<BookUpdate>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.service.update_book(&id, update).await?))
}

#[derive(Deserialize)]
struct ProgressRequest {
    current_page: i64,
    total_pages: i64,
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<Value>, ApiError> {
    let update = state
        .service
        .update_progress(&id, request.current_page, request.total_pages)
        .await?;

    Ok(Json(json!({
        "message": "Progress updated",
        "progress": update.progress,
        "current_page": update.current_page,
    })))
}

async fn add_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<NewNote>,
) -> Result<Json<Value>, ApiError> {
    let note = state.service.add_note(&id, request).await?;

    Ok(Json(json!({ "message": "Note added", "note": note })))
}

async fn add_highlight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<NewHighlight>,
) -> Result<Json<Value>, ApiError> {
    let highlight = state.service.add_highlight(&id, request).await?;

    Ok(Json(
        json!({ "message": "Highlight added", "highlight": highlight }),
    ))
}

async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.service.delete_book(&id).await?;

    Ok(Json(json!({ "message": "Book deleted" })))
}
