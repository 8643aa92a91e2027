//! Configuration schema for s3cache
//!
//! Configuration is stored at `~/.config/s3cache/config.toml`. Every value
//! is optional; command-line flags and environment variables win.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote store settings
    pub s3: S3Config,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Directory that relative artifact patterns are resolved against
    pub workdir: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            workdir: None,
        }
    }
}

/// S3 connection settings
///
/// Credentials are never read from here; they come from the standard AWS
/// environment and profile files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// Default bucket when `--bucket` is not given
    pub bucket: Option<String>,

    /// Region override
    pub region: Option<String>,

    /// Named AWS profile
    pub profile: Option<String>,

    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...)
    pub endpoint_url: Option<String>,

    /// Use path-style addressing (`endpoint/bucket/key`)
    pub force_path_style: bool,

    /// Default storage class for uploads
    pub storage_class: Option<String>,
}
