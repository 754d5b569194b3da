use papershelf_core::books::service::BookService;
use papershelf_core::database::queries::Db;
use papershelf_core::storage::client::BucketClient;

/// Shared application state handed to every handler through
/// `axum::extract::State`.
pub struct AppState {
    pub service: BookService<Db, BucketClient>,
}
