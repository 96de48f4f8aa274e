//! Testing utilities for renamr
//!
//! Provides a `TempTree` fixture for building throwaway directory trees and
//! small helpers for constructing in-memory records.
//!
//! Only available when compiled with `cfg(test)`.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::record::{FileRecord, Payload};

/// A temporary directory that is removed when dropped
///
/// # Examples
/// ```ignore
/// let tree = TempTree::new();
/// tree.file("sub/b.txt", "beta");
/// assert!(tree.path().join("sub/b.txt").exists());
/// ```
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    /// Create an empty temporary tree
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Root of the tree
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories
    ///
    /// # Panics
    /// Panics if the file or its parents cannot be created.
    pub fn file(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }
}

impl Default for TempTree {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory record whose content is the name itself
#[must_use]
pub fn record(name: &str) -> FileRecord {
    record_at(name, name)
}

/// In-memory record with an explicit relative path
#[must_use]
pub fn record_at(name: &str, relative_path: &str) -> FileRecord {
    FileRecord::new(
        name,
        relative_path,
        name.len() as u64,
        None,
        Payload::from(name.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_tree_creates_nested_files() {
        let tree = TempTree::new();
        let path = tree.file("a/b/c.txt", "content");
        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "content");
    }

    #[test]
    fn test_temp_tree_cleanup() {
        let root;
        {
            let tree = TempTree::new();
            tree.file("x.txt", "x");
            root = tree.path().to_path_buf();
            assert!(root.exists());
        }
        assert!(!root.exists());
    }

    #[test]
    fn test_record_helper() {
        let r = record_at("b.txt", "sub/b.txt");
        assert_eq!(r.relative_path, "sub/b.txt");
        assert_eq!(r.content.read_bytes().unwrap(), b"b.txt");
    }
}
