//! Blob storage client for product images.
//!
//! Talks to an S3-style object storage HTTP API: upload bytes under a
//! bucket path, get back a public URL, delete by path. Consumed only by
//! product image management; the order core never touches it.

use reqwest::Client;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::StorageConfig;

/// Errors from blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is not configured (no `STORAGE_URL`).
    #[error("blob storage is not configured")]
    NotConfigured,

    /// HTTP transport failure.
    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The storage service rejected the request.
    #[error("storage service returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Client for the blob storage service.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: Client,
    config: Option<StorageConfig>,
}

impl StorageClient {
    /// Create a storage client. `config` of `None` disables uploads.
    #[must_use]
    pub fn new(config: Option<StorageConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Whether uploads are available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Upload bytes under `path` and return the public URL.
    ///
    /// Re-uploading the same path overwrites the previous object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotConfigured` without configuration,
    /// `Transport` or `Rejected` on upload failure.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let config = self.config.as_ref().ok_or(StorageError::NotConfigured)?;

        let endpoint = format!(
            "{}/storage/v1/object/{}/{}",
            config.url.trim_end_matches('/'),
            config.bucket,
            path
        );

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(config.service_key.expose_secret())
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }

        Ok(self.public_url(config, path))
    }

    /// Delete the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotConfigured` without configuration,
    /// `Transport` or `Rejected` on failure.
    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let config = self.config.as_ref().ok_or(StorageError::NotConfigured)?;

        let endpoint = format!(
            "{}/storage/v1/object/{}/{}",
            config.url.trim_end_matches('/'),
            config.bucket,
            path
        );

        let response = self
            .http
            .delete(&endpoint)
            .bearer_auth(config.service_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }

        Ok(())
    }

    /// Public URL for an object (the bucket serves anonymous reads).
    fn public_url(&self, config: &StorageConfig, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            config.url.trim_end_matches('/'),
            config.bucket,
            path
        )
    }

    /// Recover the object path from a public URL this client produced.
    ///
    /// Returns `None` for URLs outside the configured bucket, so foreign
    /// image URLs are left alone.
    #[must_use]
    pub fn object_path<'u>(&self, url: &'u str) -> Option<&'u str> {
        let config = self.config.as_ref()?;
        let prefix = format!(
            "{}/storage/v1/object/public/{}/",
            config.url.trim_end_matches('/'),
            config.bucket
        );
        url.strip_prefix(prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_rejects_uploads() {
        let client = StorageClient::new(None);
        assert!(!client.is_configured());
        assert!(matches!(
            client.upload("images/test.jpg", vec![1, 2, 3], "image/jpeg").await,
            Err(StorageError::NotConfigured)
        ));
        assert!(matches!(
            client.delete("images/test.jpg").await,
            Err(StorageError::NotConfigured)
        ));
    }

    #[test]
    fn test_object_path_round_trip() {
        use secrecy::SecretString;

        let config = StorageConfig {
            url: "https://storage.example.com/".to_string(),
            bucket: "products".to_string(),
            service_key: SecretString::from("k"),
        };
        let client = StorageClient::new(Some(config.clone()));

        let url = client.public_url(&config, "products/abc.jpg");
        assert_eq!(client.object_path(&url), Some("products/abc.jpg"));
        assert_eq!(client.object_path("https://elsewhere.example/x.jpg"), None);
    }
}
