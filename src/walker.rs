//! Entry tree ingestion
//!
//! Collected input is modelled as a tree of [`Entry`] values: leaves are
//! files, interior nodes are directories. [`scan_path`] builds such a tree
//! from disk, and [`walk`] flattens any tree into [`FileRecord`]s.
//!
//! Walking is best-effort. A leaf whose metadata or content cannot be
//! reached is logged and skipped; the rest of the tree is still collected.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::record::{FileRecord, Payload};

/// Errors raised when the root of a scan cannot be reached
#[derive(Debug, Error)]
pub enum WalkError {
    /// The path handed in does not exist or cannot be stat'ed
    #[error("Cannot read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A node in a collected file tree
#[derive(Debug, Clone)]
pub enum Entry {
    File {
        name: String,
        payload: Payload,
        /// Only consulted for in-memory payloads; disk files report their own mtime
        modified: Option<DateTime<Utc>>,
    },
    Directory {
        name: String,
        children: Vec<Entry>,
    },
}

impl Entry {
    /// A leaf backed by a file on disk
    #[must_use]
    pub fn disk_file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            payload: Payload::Disk(path.into()),
            modified: None,
        }
    }

    /// A leaf backed by an in-memory buffer
    #[must_use]
    pub fn memory_file(name: impl Into<String>, bytes: impl Into<Payload>) -> Self {
        Self::File {
            name: name.into(),
            payload: bytes.into(),
            modified: None,
        }
    }

    #[must_use]
    pub fn directory(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Directory {
            name: name.into(),
            children,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Directory { name, .. } => name,
        }
    }
}

/// Knobs for reading a tree from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub follow_links: bool,
    pub include_hidden: bool,
    /// Visit siblings by file name instead of the order the OS reports
    pub sort_by_name: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_hidden: true,
            sort_by_name: false,
        }
    }
}

/// Build an entry tree rooted at `root`
///
/// A regular file yields a single leaf. A directory yields a directory
/// entry holding everything beneath it. Subdirectories that cannot be
/// listed end up empty.
///
/// # Errors
///
/// Returns [`WalkError::Unreadable`] if `root` itself cannot be stat'ed.
pub fn scan_path(root: &Path, options: &WalkOptions) -> Result<Entry, WalkError> {
    let metadata = fs::metadata(root).map_err(|source| WalkError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    let root_name = root
        .file_name()
        .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned());

    if !metadata.is_dir() {
        return Ok(Entry::disk_file(root_name, root));
    }

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(options.follow_links);
    if options.sort_by_name {
        walker = walker.sort_by_file_name();
    }

    let include_hidden = options.include_hidden;
    let mut top: Vec<Entry> = Vec::new();
    let mut open: Vec<(String, Vec<Entry>)> = Vec::new();

    for item in walker
        .into_iter()
        .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e))
    {
        let item = match item {
            Ok(item) => item,
            Err(err) => {
                log::warn!("skipping entry under {}: {err}", root.display());
                continue;
            }
        };

        close_until(&mut open, &mut top, item.depth() - 1);

        let name = item.file_name().to_string_lossy().into_owned();
        if item.file_type().is_dir() {
            open.push((name, Vec::new()));
        } else {
            let leaf = Entry::disk_file(name, item.into_path());
            match open.last_mut() {
                Some((_, children)) => children.push(leaf),
                None => top.push(leaf),
            }
        }
    }
    close_until(&mut open, &mut top, 0);

    Ok(Entry::directory(root_name, top))
}

/// Fold open directories into their parents until `depth` remain open
fn close_until(open: &mut Vec<(String, Vec<Entry>)>, top: &mut Vec<Entry>, depth: usize) {
    while open.len() > depth {
        let Some((name, children)) = open.pop() else {
            break;
        };
        let dir = Entry::directory(name, children);
        match open.last_mut() {
            Some((_, siblings)) => siblings.push(dir),
            None => top.push(dir),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Flatten entry trees into records, depth-first, in the order given
///
/// A top-level file gets its bare name as relative path. A top-level
/// directory contributes its contents; its own name is not part of their
/// relative paths, while every nested directory name is (followed by `/`).
#[must_use]
pub fn walk(entries: &[Entry]) -> Vec<FileRecord> {
    let mut records = Vec::new();
    for entry in entries {
        match entry {
            Entry::Directory { children, .. } => collect(children, "", &mut records),
            Entry::File { .. } => collect(std::slice::from_ref(entry), "", &mut records),
        }
    }
    records
}

fn collect(entries: &[Entry], prefix: &str, out: &mut Vec<FileRecord>) {
    for entry in entries {
        match entry {
            Entry::File {
                name,
                payload,
                modified,
            } => match read_leaf(payload, *modified) {
                Ok((size, modified)) => out.push(FileRecord::new(
                    name.clone(),
                    format!("{prefix}{name}"),
                    size,
                    modified,
                    payload.clone(),
                )),
                Err(err) => log::warn!("skipping unreadable file {prefix}{name}: {err}"),
            },
            Entry::Directory { name, children } => {
                collect(children, &format!("{prefix}{name}/"), out);
            }
        }
    }
}

/// Size and modification time of a leaf, probing that it can be opened
fn read_leaf(
    payload: &Payload,
    modified: Option<DateTime<Utc>>,
) -> io::Result<(u64, Option<DateTime<Utc>>)> {
    match payload {
        Payload::Disk(path) => {
            let metadata = fs::metadata(path)?;
            if metadata.is_dir() {
                return Err(io::Error::other("is a directory"));
            }
            fs::File::open(path)?;
            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
            Ok((metadata.len(), modified))
        }
        Payload::Memory(bytes) => Ok((bytes.len() as u64, modified)),
    }
}
