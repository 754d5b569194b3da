use anyhow::Context as _;
use std::env;

/// Process configuration, read once at startup. The core never touches the
/// environment; everything it needs arrives through these values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file, created on first start.
    pub database_path: String,
    pub storage_base_url: String,
    pub storage_bucket: String,
    pub storage_api_key: String,
}

impl ServerConfig {
    /// # Errors
    /// Fails when a required variable is missing or the port is not a number.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("PAPERSHELF_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let port = env::var("PAPERSHELF_PORT")
            .unwrap_or_else(|_| "5000".to_owned())
            .parse()
            .context("PAPERSHELF_PORT must be a port number")?;
        let database_path =
            env::var("PAPERSHELF_DB").unwrap_or_else(|_| "papershelf.db".to_owned());
        let storage_base_url =
            env::var("STORAGE_BASE_URL").context("STORAGE_BASE_URL is required")?;
        let storage_bucket = env::var("STORAGE_BUCKET").unwrap_or_else(|_| "books".to_owned());
        let storage_api_key = env::var("STORAGE_API_KEY").context("STORAGE_API_KEY is required")?;

        Ok(Self {
            host,
            port,
            database_path,
            storage_base_url,
            storage_bucket,
            storage_api_key,
        })
    }
}
