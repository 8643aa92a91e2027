//! Remote object store abstraction
//!
//! The pipeline only needs four operations on a `(bucket, key)` object.
//! [`S3Store`] talks to S3 (or any S3-compatible endpoint); [`MemoryStore`]
//! keeps objects in a map so the pipeline can be tested without a network.

pub mod memory;
pub mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use crate::error::CacheResult;
use async_trait::async_trait;

/// Abstract object store interface
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upload `body` as `key`, replacing any existing object
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        storage_class: Option<&str>,
    ) -> CacheResult<()>;

    /// Download the full object
    async fn get(&self, bucket: &str, key: &str) -> CacheResult<Vec<u8>>;

    /// Check whether the object exists
    ///
    /// Absence is `Ok(false)`; every other failure is an error.
    async fn exists(&self, bucket: &str, key: &str) -> CacheResult<bool>;

    /// Delete the object; deleting an absent object succeeds
    async fn delete(&self, bucket: &str, key: &str) -> CacheResult<()>;

    /// Get the human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}
