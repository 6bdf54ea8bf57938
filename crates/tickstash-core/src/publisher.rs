//! Blob publisher: copies the local table and chart artifacts to an
//! object-store bucket under the `stocks/` prefix.
//!
//! Upload happens last in the pipeline, so a failed upload never loses
//! data: the store entity and the local files are already in place and
//! the next run re-publishes the full state.

use std::pin::Pin;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::http_client::{HttpClient, HttpRequest};

/// Object keys live under a fixed prefix inside the bucket.
pub const BLOB_KEY_PREFIX: &str = "stocks";

/// Object key for an artifact file name, e.g. `stocks/MSFT_stock_data.csv`.
pub fn blob_key(file_name: &str) -> String {
    format!("{BLOB_KEY_PREFIX}/{file_name}")
}

/// Destination bucket and endpoint for published artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub endpoint: String,
    pub bucket: String,
}

impl PublisherConfig {
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
        }
    }

    /// Read the destination from `TICKSTASH_BUCKET` and
    /// `TICKSTASH_STORAGE_ENDPOINT`. Returns `None` when no bucket is
    /// configured, which disables publishing for the run.
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("TICKSTASH_BUCKET").ok()?;
        if bucket.trim().is_empty() {
            return None;
        }
        let endpoint = std::env::var("TICKSTASH_STORAGE_ENDPOINT")
            .unwrap_or_else(|_| String::from("https://storage.googleapis.com"));
        Some(Self::new(endpoint, bucket))
    }

    fn object_url(&self, key: &str) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        format!("{endpoint}/{}/{key}", self.bucket)
    }
}

/// Destination contract for published artifacts.
///
/// The pipeline talks to this trait so tests can capture uploads without
/// a network, the same way `DataSource` decouples the fetcher.
pub trait BlobStore: Send + Sync {
    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), PipelineError>> + Send + 'a>>;
}

/// Discard-everything destination for runs with publishing disabled.
#[derive(Debug, Default)]
pub struct NoopBlobStore;

impl BlobStore for NoopBlobStore {
    fn put<'a>(
        &'a self,
        _key: &'a str,
        _bytes: Vec<u8>,
        _content_type: &'a str,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), PipelineError>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}

/// Object-store destination that uploads with plain HTTP PUT against
/// `{endpoint}/{bucket}/{key}`.
pub struct HttpBlobStore {
    config: PublisherConfig,
    http_client: Arc<dyn HttpClient>,
}

impl HttpBlobStore {
    pub fn new(config: PublisherConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

impl BlobStore for HttpBlobStore {
    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<(), PipelineError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::put(self.config.object_url(key))
                .with_header("content-type", content_type)
                .with_body(bytes);

            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|e| PipelineError::Upload {
                    key: key.to_string(),
                    reason: e.message().to_string(),
                })?;

            if !response.is_success() {
                return Err(PipelineError::Upload {
                    key: key.to_string(),
                    reason: format!("unexpected status {}", response.status),
                });
            }

            Ok(())
        })
    }
}
