//! Cache pipeline: glue between patterns, archives and the remote store
//!
//! | Action | Steps |
//! |--------|-------|
//! | put | expand patterns → create archive → upload |
//! | get | exists? → download → expand archive (miss if absent) |
//! | delete | delete object |
//!
//! Each request runs to completion or stops at the first failing step.
//! Nothing is retried or rolled back.

use crate::archive::{create_archive, expand_archive};
use crate::error::{CacheError, CacheResult};
use crate::pattern::expand_patterns;
use crate::request::{Action, CacheRequest};
use crate::store::RemoteStore;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of a completed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Archive uploaded
    Stored { bytes: usize, entries: usize },
    /// Archive downloaded and expanded
    Restored { bytes: usize, entries: usize },
    /// No object for the key; not an error
    Miss,
    /// Object deleted (or already absent)
    Purged,
}

impl Outcome {
    /// Whether a restore found nothing
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }
}

/// Request lifecycle, logged as the pipeline advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    Executing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Executing => "executing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Runs cache requests against one remote store
pub struct CachePipeline<S: RemoteStore> {
    store: S,
    root: PathBuf,
}

impl<S: RemoteStore> CachePipeline<S> {
    /// Create a pipeline whose relative paths resolve against `root`
    pub fn new(store: S, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    /// The remote store in use
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute a request start to finish
    pub async fn execute(&self, request: &CacheRequest) -> CacheResult<Outcome> {
        let object_key = request.object_key();
        debug!(
            action = %request.action,
            bucket = %request.bucket,
            key = %object_key,
            backend = self.store.backend_name(),
            stage = %Stage::Validating,
            "Request received"
        );
        if let Err(e) = validate(request) {
            warn!(action = %request.action, stage = %Stage::Failed, "{}", e);
            return Err(e);
        }

        debug!(action = %request.action, stage = %Stage::Executing, "Running request");
        let result = match request.action {
            Action::Store => self.store_cache(request, &object_key).await,
            Action::Restore => self.restore_cache(request, &object_key).await,
            Action::Purge => self.purge_cache(request, &object_key).await,
        };

        match &result {
            Ok(outcome) => {
                debug!(action = %request.action, stage = %Stage::Done, ?outcome, "Request finished")
            }
            Err(e) => warn!(
                action = %request.action,
                bucket = %request.bucket,
                key = %object_key,
                stage = %Stage::Failed,
                retryable = e.is_retryable(),
                "{}",
                e
            ),
        }
        result
    }

    async fn store_cache(&self, request: &CacheRequest, object_key: &str) -> CacheResult<Outcome> {
        let paths = expand_patterns(&self.root, &request.patterns)?;
        if paths.is_empty() {
            return Err(CacheError::NoMatches);
        }

        let archive = create_archive(&self.root, &paths)?;
        let bytes = archive.len();
        let entries = archive.entries;

        self.store
            .put(
                &request.bucket,
                object_key,
                archive.bytes,
                request.storage_class.as_deref(),
            )
            .await?;

        info!("Cache saved successfully");
        Ok(Outcome::Stored { bytes, entries })
    }

    async fn restore_cache(
        &self,
        request: &CacheRequest,
        object_key: &str,
    ) -> CacheResult<Outcome> {
        if !self.store.exists(&request.bucket, object_key).await? {
            info!("No caches found for the following key: {}", object_key);
            return Ok(Outcome::Miss);
        }

        let blob = self.store.get(&request.bucket, object_key).await?;
        info!("Cache downloaded successfully, containing {} bytes", blob.len());

        let entries = expand_archive(&self.root, &blob)?;
        Ok(Outcome::Restored {
            bytes: blob.len(),
            entries,
        })
    }

    async fn purge_cache(&self, request: &CacheRequest, object_key: &str) -> CacheResult<Outcome> {
        self.store.delete(&request.bucket, object_key).await?;
        info!("Cache purged successfully");
        Ok(Outcome::Purged)
    }
}

/// Re-check a request before touching the store
///
/// Requests built with [`CacheRequest::new`] always pass; this catches
/// hand-assembled ones since the fields are public.
fn validate(request: &CacheRequest) -> CacheResult<()> {
    if request.bucket.trim().is_empty() {
        return Err(CacheError::ConfigMissing("bucket"));
    }
    if request.key.trim().is_empty() {
        return Err(CacheError::ConfigMissing("key"));
    }
    if request.action == Action::Store && request.patterns.is_empty() {
        return Err(CacheError::NoArtifacts);
    }
    Ok(())
}
