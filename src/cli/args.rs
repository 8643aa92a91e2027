//! CLI argument definitions using clap derive
//!
//! Every option can also come from the environment so the binary drops into
//! CI systems that pass step inputs as variables.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// s3cache - CI build cache on S3
///
/// Archives artifacts matching glob patterns and uploads them under a cache
/// key, restores them on a later run, or purges them.
#[derive(Parser, Debug)]
#[command(name = "s3cache")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Action to perform: put, get or delete
    #[arg(short, long, env = "ACTION")]
    pub action: String,

    /// Bucket holding cache archives
    #[arg(short, long, env = "BUCKET")]
    pub bucket: Option<String>,

    /// Cache key (".zip" is appended for the object name)
    #[arg(short, long, env = "KEY")]
    pub key: String,

    /// Artifact glob patterns, one per line (required for put)
    #[arg(long, env = "ARTIFACTS", value_delimiter = '\n')]
    pub artifacts: Vec<String>,

    /// Storage class for uploaded archives (passed through to S3)
    #[arg(long, env = "STORAGE_CLASS")]
    pub storage_class: Option<String>,

    /// Directory that relative patterns and restored paths resolve against
    #[arg(short, long, env = "S3CACHE_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "S3CACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (defaults to the config value)
    #[arg(long, env = "S3CACHE_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Log output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse the `[general] log_format` config value, defaulting to text
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}
