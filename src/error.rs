//! Error types for s3cache
//!
//! All modules use `CacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for s3cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur while storing, restoring or purging a cache
#[derive(Error, Debug)]
pub enum CacheError {
    // Configuration errors
    #[error("Missing required setting: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("No artifacts patterns provided")]
    NoArtifacts,

    #[error("Action \"{0}\" is not allowed. Valid options are: [put, get, delete]")]
    InvalidAction(String),

    // Pattern errors
    #[error("Cannot match pattern {pattern}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("No files matched the artifact patterns")]
    NoMatches,

    // Archive errors
    #[error("Cannot add {path} to the archive: {reason}")]
    ArchiveCreate { path: PathBuf, reason: String },

    #[error("Cannot read archive: {0}")]
    ArchiveRead(String),

    #[error("Cannot write {path} while expanding archive: {source}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Remote store errors
    #[error("Unable to {op} object {key} in bucket {bucket}: {reason}")]
    RemoteTransfer {
        op: &'static str,
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Object {key} not found in bucket {bucket}")]
    NotFound { bucket: String, key: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a remote transfer error for one object operation
    pub fn remote(
        op: &'static str,
        bucket: impl Into<String>,
        key: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::RemoteTransfer {
            op,
            bucket: bucket.into(),
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an archive creation error for a path
    pub fn archive_create(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArchiveCreate {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteTransfer { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigMissing("bucket") => {
                Some("Pass --bucket, set BUCKET, or add `bucket` to the [s3] config section")
            }
            Self::ConfigMissing("key") => Some("Pass --key or set KEY"),
            Self::NoArtifacts => Some("Pass --artifacts or set ARTIFACTS (one glob per line)"),
            Self::InvalidAction(_) => Some("Use --action put, --action get or --action delete"),
            Self::NoMatches => Some("Check the patterns against --workdir"),
            _ => None,
        }
    }
}
