//! In-memory object store
//!
//! Behaves like S3 for the operations the pipeline uses: put overwrites,
//! delete of an absent key succeeds, and `exists` reports absence without
//! error. Failures can be injected per operation.

use super::RemoteStore;
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    storage_class: Option<String>,
}

/// Map-backed [`RemoteStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: Mutex<Vec<String>>,
    /// When set, only this bucket exists
    bucket: Option<String>,
    /// Operation name that always fails
    fail_on: Option<&'static str>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept operations against `bucket`
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Make every call to `op` (`put`, `get`, `exists`, `delete`) fail
    pub fn with_failure(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    /// Seed an object directly
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                storage_class: None,
            },
        );
    }

    /// Stored bytes for an object, if present
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.body.clone())
    }

    /// Storage class the object was uploaded with
    pub fn storage_class(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects()
            .get(&(bucket.to_string(), key.to_string()))
            .and_then(|o| o.storage_class.clone())
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Operations performed so far, as `"<op> <bucket>/<key>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<(String, String), StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and apply injected failures and bucket checks
    fn check(&self, op: &'static str, bucket: &str, key: &str) -> CacheResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{} {}/{}", op, bucket, key));

        if self.fail_on == Some(op) {
            return Err(CacheError::remote(op, bucket, key, "injected failure"));
        }
        if self.bucket.as_deref().is_some_and(|b| b != bucket) {
            return Err(CacheError::remote(op, bucket, key, "NoSuchBucket"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        storage_class: Option<&str>,
    ) -> CacheResult<()> {
        self.check("put", bucket, key)?;
        self.objects().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                storage_class: storage_class.map(String::from),
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> CacheResult<Vec<u8>> {
        self.check("get", bucket, key)?;
        self.object(bucket, key).ok_or_else(|| CacheError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn exists(&self, bucket: &str, key: &str) -> CacheResult<bool> {
        match self.check("exists", bucket, key) {
            Ok(()) => Ok(self.object(bucket, key).is_some()),
            // HEAD on a missing bucket looks like a missing key
            Err(CacheError::RemoteTransfer { reason, .. }) if reason == "NoSuchBucket" => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> CacheResult<()> {
        self.check("delete", bucket, key)?;
        self.objects().remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
