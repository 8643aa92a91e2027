//! ZIP archive creation and expansion for cache blobs
//!
//! Archives are built entirely in memory. Entry names are the walked paths
//! exactly as encountered, so expanding an archive recreates the same tree
//! relative to the working root without any extra metadata.
//!
//! # Entry layout
//!
//! | Node | Entry | Content |
//! |------|-------|---------|
//! | Directory | `path/` | none |
//! | File | `path` | deflated file bytes |
//! | Symlink | as its target | target bytes, or none for a directory |
//!
//! Unix permission bits are stored on every entry and reapplied when a file
//! is created during expansion.

mod create;
mod extract;

pub use create::create_archive;
pub use extract::expand_archive;

use std::path::Path;

/// An in-memory archive produced by [`create_archive`]
#[derive(Debug, Clone, Default)]
pub struct ArchiveSummary {
    /// Raw ZIP bytes
    pub bytes: Vec<u8>,
    /// Number of entries written, directories included
    pub entries: usize,
}

impl ArchiveSummary {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Convert a filesystem path into a ZIP entry name (`/` separated)
fn entry_name(path: &Path) -> Option<String> {
    let name = path.to_str()?;
    if cfg!(windows) {
        Some(name.replace('\\', "/"))
    } else {
        Some(name.to_string())
    }
}
