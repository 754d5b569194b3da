//! The main function for the Papershelf HTTP server
use crate::config::ServerConfig;
use crate::state::AppState;
use anyhow::Context as _;
use papershelf_core::books::service::BookService;
use papershelf_core::database::queries::Db;
use papershelf_core::storage::client::{BucketClient, BucketConfig};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Process configuration from environment variables
mod config;
/// Translation from core errors to HTTP responses
mod errors;
/// Route table and request handlers
mod routes;
/// Shared application state
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, the environment itself may be populated
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env()?;

    let db = Db::init(Path::new(&config.database_path))
        .await
        .with_context(|| format!("failed to open database at {}", config.database_path))?;
    log::info!("Opened database at {}", config.database_path);

    let storage = BucketClient::new(BucketConfig {
        base_url: config.storage_base_url.clone(),
        bucket: config.storage_bucket.clone(),
        api_key: config.storage_api_key.clone(),
    })
    .context("failed to build object store client")?;

    let state = Arc::new(AppState {
        service: BookService::new(Arc::new(db), storage),
    });

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
