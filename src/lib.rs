//! s3cache - CI build cache on S3
//!
//! Archives artifacts matched by glob patterns into a ZIP, stores it in a
//! bucket under a cache key, and restores or purges it on later runs.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod request;
pub mod store;
pub mod ui;

pub use error::{CacheError, CacheResult};
pub use pipeline::{CachePipeline, Outcome};
pub use request::{Action, CacheRequest};
pub use store::{MemoryStore, RemoteStore, S3Store};
