//! Archive expansion
//!
//! Expansion is not transactional: if an entry fails, entries written before
//! it stay on disk.

use crate::error::{CacheError, CacheResult};
use std::fs::{self, File, OpenOptions};
use std::io::{Cursor, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use zip::ZipArchive;

/// Mode used when an entry carries no unix permissions
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Expand a ZIP blob onto the filesystem, returning the number of entries
///
/// Entry names are resolved against `root` (absolute names stay absolute).
/// An empty blob is treated as an empty cache.
pub fn expand_archive(root: &Path, blob: &[u8]) -> CacheResult<usize> {
    if blob.is_empty() {
        debug!("Archive is empty, nothing to expand");
        return Ok(0);
    }

    let mut archive =
        ZipArchive::new(Cursor::new(blob)).map_err(|e| CacheError::ArchiveRead(e.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| CacheError::ArchiveRead(format!("entry {}: {}", index, e)))?;

        let name = entry.name().to_string();
        let target = root.join(name.trim_end_matches('/'));

        if entry.is_dir() {
            trace!("dir  {}", name);
            fs::create_dir_all(&target).map_err(|e| write_error(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }

        trace!("file {}", name);
        let mode = entry.unix_mode().map(|m| m & 0o7777).unwrap_or(DEFAULT_FILE_MODE);
        let mut out = open_target(&target, mode)?;
        copy_entry(&name, &mut entry, &target, &mut out)?;
    }

    debug!("Expanded {} entries into {}", archive.len(), root.display());
    Ok(archive.len())
}

fn open_target(target: &Path, mode: u32) -> CacheResult<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(target).map_err(|e| write_error(target, e))
}

/// Copy entry bytes, keeping read and write failures apart
fn copy_entry(
    name: &str,
    entry: &mut impl Read,
    target: &Path,
    out: &mut File,
) -> CacheResult<()> {
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CacheError::ArchiveRead(format!("{}: {}", name, e))),
        };
        out.write_all(&buf[..n]).map_err(|e| write_error(target, e))?;
    }
}

fn write_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::ArchiveWrite {
        path: PathBuf::from(path),
        source,
    }
}
