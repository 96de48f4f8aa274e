//! File records
//!
//! A [`FileRecord`] is the in-memory representation of one collected file.
//! Everything about it is fixed at ingestion except `display_name`, which
//! the rename engine rewrites. The bytes behind a record are referenced
//! through a [`Payload`] and only read when an archive is built.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Opaque record identifier, unique for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Allocate a fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the bytes of a record live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A file on disk, read lazily
    Disk(PathBuf),
    /// A shared in-memory buffer
    Memory(Arc<[u8]>),
}

impl Payload {
    /// Read the full payload
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if a disk payload cannot be read.
    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        match self {
            Self::Disk(path) => std::fs::read(path),
            Self::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

    /// Path on disk, if this payload is file-backed
    #[must_use]
    pub fn disk_path(&self) -> Option<&Path> {
        match self {
            Self::Disk(path) => Some(path),
            Self::Memory(_) => None,
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Memory(bytes.into())
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Memory(bytes.into())
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disk(path) => serializer.serialize_str(&path.display().to_string()),
            Self::Memory(bytes) => serializer.serialize_str(&format!("<memory: {} bytes>", bytes.len())),
        }
    }
}

/// One collected file
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub id: RecordId,
    pub original_name: String,
    pub display_name: String,
    pub relative_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(rename = "source")]
    pub content: Payload,
}

impl FileRecord {
    /// Create a record whose display name starts out equal to its original name
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        relative_path: impl Into<String>,
        size_bytes: u64,
        last_modified: Option<DateTime<Utc>>,
        content: Payload,
    ) -> Self {
        let original_name = name.into();
        Self {
            id: RecordId::new(),
            mime_type: detect_mime_type(&original_name).map(String::from),
            display_name: original_name.clone(),
            original_name,
            relative_path: relative_path.into(),
            size_bytes,
            last_modified,
            content,
        }
    }

    /// Whether the display name differs from the name the file came in with
    #[must_use]
    pub fn is_renamed(&self) -> bool {
        self.display_name != self.original_name
    }

    /// Directory part of `relative_path`, including the trailing separator
    #[must_use]
    pub fn directory(&self) -> &str {
        self.relative_path
            .rfind('/')
            .map_or("", |idx| &self.relative_path[..=idx])
    }
}

/// Extension based MIME detection, mirroring what a browser reports for a file
#[must_use]
pub fn detect_mime_type(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_lowercase().as_str() {
        "txt" | "log" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "html" | "htm" => Some("text/html"),
        "css" => Some("text/css"),
        "js" | "mjs" => Some("text/javascript"),
        "rs" => Some("text/x-rust"),
        "json" => Some("application/json"),
        "toml" => Some("application/toml"),
        "yaml" | "yml" => Some("application/yaml"),
        "xml" => Some("application/xml"),
        "pdf" => Some("application/pdf"),
        "zip" => Some("application/zip"),
        "gz" => Some("application/gzip"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}
