//! Archive creation
//!
//! Walks every matched path depth-first and writes one ZIP entry per node.

use super::{entry_name, ArchiveSummary};
use crate::error::{CacheError, CacheResult};
use std::collections::HashSet;
use std::fs::{self, File, Metadata};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Files at or above this size need ZIP64 headers
const LARGE_FILE_THRESHOLD: u64 = u32::MAX as u64;

/// Create a deflated ZIP archive from matched paths
///
/// `paths` are resolved against `root`; entry names are the paths as given
/// plus whatever the walk appends below them. Overlapping inputs (a
/// directory and a file inside it) reach the same node twice; only the
/// first visit is written since ZIP names must be unique.
pub fn create_archive(root: &Path, paths: &[PathBuf]) -> CacheResult<ArchiveSummary> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut written = HashSet::new();
    let mut entries = 0usize;

    for path in paths {
        entries += append_tree(&mut writer, &mut written, root, path)?;
    }

    let bytes = writer
        .finish()
        .map_err(|e| CacheError::archive_create(root, e))?
        .into_inner();

    debug!("Created archive with {} entries ({} bytes)", entries, bytes.len());
    Ok(ArchiveSummary { bytes, entries })
}

/// Append `path` and everything below it, returning the number of new entries
fn append_tree(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    written: &mut HashSet<String>,
    root: &Path,
    path: &Path,
) -> CacheResult<usize> {
    let start = root.join(path);
    let mut count = 0usize;

    let walker = WalkDir::new(&start)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let failed = e.path().map(Path::to_path_buf).unwrap_or_else(|| start.clone());
            CacheError::archive_create(failed, e)
        })?;

        let name_path = if path.is_relative() {
            entry.path().strip_prefix(root).unwrap_or(entry.path())
        } else {
            entry.path()
        };
        let name = entry_name(name_path)
            .ok_or_else(|| CacheError::archive_create(entry.path(), "path is not valid UTF-8"))?;
        if name.is_empty() {
            continue;
        }
        if written.contains(&name) {
            trace!("skip {} (already archived)", name);
            continue;
        }

        // Symlinks are stored as whatever they point at
        let metadata = if entry.path_is_symlink() {
            fs::metadata(entry.path())
        } else {
            entry.metadata().map_err(io::Error::from)
        }
        .map_err(|e| CacheError::archive_create(entry.path(), e))?;

        let options = entry_options(&metadata);

        if metadata.is_dir() {
            trace!("dir  {}", name);
            writer
                .add_directory(name.as_str(), options)
                .map_err(|e| CacheError::archive_create(entry.path(), e))?;
        } else {
            trace!("file {}", name);
            let mut file = File::open(entry.path())
                .map_err(|e| CacheError::archive_create(entry.path(), e))?;
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| CacheError::archive_create(entry.path(), e))?;
            io::copy(&mut file, writer)
                .map_err(|e| CacheError::archive_create(entry.path(), e))?;
        }
        written.insert(name);
        count += 1;
    }

    Ok(count)
}

fn entry_options(metadata: &Metadata) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(permission_bits(metadata))
        .large_file(metadata.len() >= LARGE_FILE_THRESHOLD)
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
