use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use papershelf_core::books::errors::BookError;
use serde_json::json;

/// Response-side wrapper around the core error taxonomy. The core stays
/// HTTP-agnostic; this is the single place where kinds become status codes.
pub struct ApiError(BookError);

impl From<BookError> for ApiError {
    #[inline]
    fn from(error: BookError) -> Self {
        Self(error)
    }
}

/// Status code and stable kind label for an error. The label ends up in the
/// `error` field of the response body; clients match on it, not on the
/// human-readable details.
pub fn status_and_kind(error: &BookError) -> (StatusCode, &'static str) {
    match *error {
        BookError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        BookError::InvalidIdentifier(_) => (StatusCode::BAD_REQUEST, "invalid_identifier"),
        BookError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        BookError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        BookError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error"),
        BookError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unexpected_error"),
        // The taxonomy is non-exhaustive; treat anything new as a 500
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "unexpected_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = status_and_kind(&self.0);
        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        }
        let body = Json(json!({ "error": kind, "details": self.0.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_faults_map_to_400() {
        let validation = BookError::Validation("title required".to_owned());
        let identifier = BookError::InvalidIdentifier("not-an-id".to_owned());

        assert_eq!(status_and_kind(&validation).0, StatusCode::BAD_REQUEST);
        assert_eq!(status_and_kind(&identifier).0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn absent_documents_map_to_404() {
        assert_eq!(status_and_kind(&BookError::NotFound).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn backend_faults_map_to_500() {
        let unexpected = BookError::Unexpected("boom".to_owned());

        let (status, kind) = status_and_kind(&unexpected);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(kind, "unexpected_error");
    }
}
