use crate::storage::errors::StorageError;
use async_trait::async_trait;
use core::time::Duration;
use reqwest::{ClientBuilder, header};
use uuid::Uuid;

/// Capability over the external object store: put a blob under a generated
/// unique name and hand back a public, stable URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `bytes` under a freshly generated name carrying `extension`.
    /// # Errors
    /// Fails on empty input or on any transport/store failure; a failed
    /// upload never yields a URL.
    async fn upload(&self, bytes: &[u8], extension: &str) -> Result<String, StorageError>;
}

/// Connection parameters of the bucket store.
#[derive(Debug, Clone)]
pub struct BucketConfig {
    /// Base URL of the store, without a trailing slash.
    pub base_url: String,
    /// Bucket that holds all book binaries.
    pub bucket: String,
    /// Bearer token presented on every upload.
    pub api_key: String,
}

/// HTTP client for a Supabase-style bucket store. Objects are addressed as
/// `{base_url}/{bucket}/{name}` and that address doubles as the public URL.
pub struct BucketClient {
    http_client: reqwest::Client,
    config: BucketConfig,
}

impl BucketClient {
    /// Create the upload client used for all subsequent storage requests.
    ///
    /// Only a connect timeout is set. There is deliberately no overall
    /// request timeout: the upload contract specifies none, and a stalled
    /// backend stalls the caller.
    /// # Errors
    /// Fails when the underlying HTTP client cannot be constructed.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called once at startup")]
    pub fn new(config: BucketConfig) -> Result<Self, StorageError> {
        let http_client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(StorageError::Client)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/{}/{name}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bucket
        )
    }
}

/// Generate a storage name independent of the caller's original filename, so
/// concurrent uploads of identically named files cannot collide.
fn object_name(extension: &str) -> String {
    format!("{}.{extension}", Uuid::new_v4())
}

/// Content type sent to the store as metadata. It is never used for
/// validation; the service has already vetted the filename.
fn content_type_for(extension: &str) -> &'static str {
    if extension.eq_ignore_ascii_case("pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl ObjectStorage for BucketClient {
    #[allow(clippy::missing_inline_in_public_items, reason = "Trait method")]
    async fn upload(&self, bytes: &[u8], extension: &str) -> Result<String, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::EmptyObject);
        }

        let name = object_name(extension);
        let url = self.object_url(&name);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, content_type_for(extension))
            // Never overwrite an existing object, even on a name collision
            .header("x-upsert", "false")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        log::info!("Stored object {name} ({} bytes)", bytes.len());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> BucketClient {
        BucketClient::new(BucketConfig {
            base_url: "https://store.example".to_owned(),
            bucket: "books".to_owned(),
            api_key: "key".to_owned(),
        })
        .unwrap()
    }

    #[test]
    fn object_names_carry_the_extension() {
        let name = object_name("pdf");

        assert!(name.ends_with(".pdf"));
        // uuid (36 chars) + "." + extension
        assert_eq!(name.len(), 40);
    }

    #[test]
    fn object_names_never_collide() {
        assert_ne!(object_name("pdf"), object_name("pdf"));
    }

    #[test]
    fn public_url_is_derivable_from_base_bucket_and_name() {
        let url = client().object_url("abc.pdf");

        assert_eq!(url, "https://store.example/books/abc.pdf");
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let client = BucketClient::new(BucketConfig {
            base_url: "https://store.example/".to_owned(),
            bucket: "books".to_owned(),
            api_key: "key".to_owned(),
        })
        .unwrap();

        assert_eq!(
            client.object_url("abc.pdf"),
            "https://store.example/books/abc.pdf"
        );
    }

    #[test]
    fn content_type_is_inferred_from_extension() {
        assert_eq!(content_type_for("pdf"), "application/pdf");
        assert_eq!(content_type_for("PDF"), "application/pdf");
        assert_eq!(content_type_for("epub"), "application/octet-stream");
    }

    #[tokio::test]
    async fn empty_payload_is_refused_before_any_request() {
        let result = client().upload(&[], "pdf").await;

        assert!(matches!(result, Err(StorageError::EmptyObject)));
    }
}
