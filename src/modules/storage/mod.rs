//! Image storage
//!
//! Defines the image store collaborator used by the dashboard handlers and
//! its MinIO/S3-compatible implementation.

mod image_source;
mod minio_client;
mod remote_host;
mod sigv4;

use async_trait::async_trait;

use crate::core::error::Result;

pub use minio_client::MinIOClient;

/// Hosting service for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload the image referenced by `source` into `folder`.
    ///
    /// Returns the canonical URL under which the store serves the image.
    async fn upload(&self, source: &str, folder: &str) -> Result<String>;

    /// Remove an image previously returned by [`ImageStore::upload`]
    async fn remove(&self, url: &str) -> Result<()>;
}
