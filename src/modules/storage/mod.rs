//! Storage module for generated e-book content
//!
//! Provides the `ObjectStore` seam used by the e-book pipeline and the
//! MinIO/S3-compatible implementation behind it.

use async_trait::async_trait;

use crate::core::error::AppError;

mod minio_client;

pub use minio_client::MinIOClient;

/// Object storage seam for the e-book pipeline.
///
/// Uploads overwrite any existing object at the same key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return the stored object key.
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;

    /// Direct URL for a stored object.
    fn public_url(&self, key: &str) -> String;
}
