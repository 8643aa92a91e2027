//! Artifact pattern expansion
//!
//! Expands shell-style globs (`*`, `?`, `[...]` and recursive `**`) into
//! concrete paths. Directories are returned as-is; the archiver walks them.

use crate::error::{CacheError, CacheResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expand artifact patterns into matched paths
///
/// Relative patterns are evaluated against `root` and their matches are
/// returned relative to `root`, so archive entry names look exactly like
/// the pattern the user wrote. Absolute patterns stay absolute.
///
/// The result keeps first-seen order and contains each path once.
pub fn expand_patterns(root: &Path, patterns: &[String]) -> CacheResult<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for pattern in patterns {
        let mut count = 0usize;
        for path in expand_one(root, pattern)? {
            count += 1;
            if seen.insert(path.clone()) {
                matched.push(path);
            }
        }

        if count == 0 {
            warn!("Pattern {} matched no files", pattern);
        } else {
            debug!("Pattern {} matched {} path(s)", pattern, count);
        }
    }

    Ok(matched)
}

fn expand_one(root: &Path, pattern: &str) -> CacheResult<Vec<PathBuf>> {
    let relative = Path::new(pattern).is_relative();
    let full = if relative {
        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        format!("{}/{}", escaped_root.trim_end_matches('/'), pattern)
    } else {
        pattern.to_string()
    };

    let entries = glob::glob(&full).map_err(|e| CacheError::Pattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if relative => match path.strip_prefix(root) {
                Ok(rel) => paths.push(rel.to_path_buf()),
                Err(_) => paths.push(path),
            },
            Ok(path) => paths.push(path),
            Err(e) => warn!("Skipping unreadable path {}: {}", e.path().display(), e.error()),
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn matches_are_relative_to_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "build/a.bin");
        touch(temp.path(), "build/b.bin");
        touch(temp.path(), "build/c.txt");

        let found = expand_patterns(temp.path(), &patterns(&["build/*.bin"])).unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("build/a.bin"), PathBuf::from("build/b.bin")]
        );
    }

    #[test]
    fn directories_are_returned_unexpanded() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "node_modules/left-pad/index.js");

        let found = expand_patterns(temp.path(), &patterns(&["node_modules"])).unwrap();
        assert_eq!(found, vec![PathBuf::from("node_modules")]);
    }

    #[test]
    fn overlapping_patterns_are_deduplicated() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "out/x.o");

        let found = expand_patterns(temp.path(), &patterns(&["out/*", "out/x.?"])).unwrap();
        assert_eq!(found, vec![PathBuf::from("out/x.o")]);
    }

    #[test]
    fn recursive_glob() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/b/c/deep.log");
        touch(temp.path(), "a/top.log");

        let found = expand_patterns(temp.path(), &patterns(&["a/**/*.log"])).unwrap();
        assert!(found.contains(&PathBuf::from("a/b/c/deep.log")));
        assert!(found.contains(&PathBuf::from("a/top.log")));
    }

    #[test]
    fn absolute_patterns_stay_absolute() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "abs.txt");
        let other = TempDir::new().unwrap();

        let pattern = format!("{}/abs.*", temp.path().display());
        let found = expand_patterns(other.path(), &[pattern]).unwrap();
        assert_eq!(found, vec![temp.path().join("abs.txt")]);
    }

    #[test]
    fn no_match_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let found = expand_patterns(temp.path(), &patterns(&["missing/*"])).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn invalid_syntax() {
        let temp = TempDir::new().unwrap();
        let err = expand_patterns(temp.path(), &patterns(&["a/[unclosed"])).unwrap_err();
        assert!(matches!(err, CacheError::Pattern { ref pattern, .. } if pattern == "a/[unclosed"));
    }
}
