//! Cache request model
//!
//! A [`CacheRequest`] is validated once on construction; everything
//! downstream can rely on a non-empty bucket and key, and on at least one
//! pattern when the action is [`Action::Store`].

use crate::error::{CacheError, CacheResult};
use std::fmt;
use std::str::FromStr;

/// Suffix appended to the cache key to form the object name
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// What to do with the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Archive artifacts and upload them (`put`)
    Store,
    /// Download and expand a previously stored archive (`get`)
    Restore,
    /// Delete the stored archive (`delete`)
    Purge,
}

impl Action {
    /// Name used on the command line and in the environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Store => "put",
            Self::Restore => "get",
            Self::Purge => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "put" | "store" => Ok(Self::Store),
            "get" | "restore" => Ok(Self::Restore),
            "delete" | "purge" => Ok(Self::Purge),
            _ => Err(CacheError::InvalidAction(s.to_string())),
        }
    }
}

/// A single validated cache operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    pub action: Action,
    pub bucket: String,
    pub key: String,
    pub storage_class: Option<String>,
    /// Glob patterns; always empty unless `action` is `Store`
    pub patterns: Vec<String>,
}

impl CacheRequest {
    /// Build and validate a request
    ///
    /// Pattern lines are trimmed and blank lines dropped, so an unset
    /// `ARTIFACTS` variable yields no patterns rather than one empty one.
    pub fn new(
        action: Action,
        bucket: impl Into<String>,
        key: impl Into<String>,
        storage_class: Option<String>,
        patterns: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> CacheResult<Self> {
        let bucket = bucket.into().trim().to_string();
        if bucket.is_empty() {
            return Err(CacheError::ConfigMissing("bucket"));
        }

        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(CacheError::ConfigMissing("key"));
        }

        let storage_class = storage_class
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let patterns = match action {
            Action::Store => {
                let patterns = split_patterns(patterns);
                if patterns.is_empty() {
                    return Err(CacheError::NoArtifacts);
                }
                patterns
            }
            Action::Restore | Action::Purge => Vec::new(),
        };

        Ok(Self {
            action,
            bucket,
            key,
            storage_class,
            patterns,
        })
    }

    /// Object name in the bucket: the key with the archive suffix
    pub fn object_key(&self) -> String {
        format!("{}{}", self.key, ARCHIVE_SUFFIX)
    }
}

/// Split newline-separated pattern values into individual non-blank globs
fn split_patterns(values: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    values
        .into_iter()
        .flat_map(|v| {
            v.as_ref()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}
