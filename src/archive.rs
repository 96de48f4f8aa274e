//! Zip export
//!
//! The archive is assembled completely in memory before anything touches
//! the output path. Entry contents are the untouched original bytes; entry
//! names come from the current display names.
//!
//! Two records that end up with the same entry name are not deduplicated:
//! the last one in store order wins and the earlier ones are left out.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, Timelike};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::record::FileRecord;

type Result<T> = std::result::Result<T, ExportError>;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// A record's content could not be read
    #[error("Cannot read content of '{name}': {source}")]
    Unreadable {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The zip writer failed
    #[error("Archive error: {0}")]
    Zip(#[from] ZipError),

    /// Writing the finished archive failed
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How entry names are laid out inside the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveLayout {
    /// Every entry at the archive root under its display name
    #[default]
    Flat,
    /// Keep the directory part of the relative path in front of the display name
    Nested,
}

/// Entry compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl From<Compression> for CompressionMethod {
    fn from(value: Compression) -> Self {
        match value {
            Compression::Stored => Self::Stored,
            Compression::Deflated => Self::Deflated,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub layout: ArchiveLayout,
    pub compression: Compression,
}

/// Name a record is stored under
#[must_use]
pub fn entry_name(record: &FileRecord, layout: ArchiveLayout) -> String {
    match layout {
        ArchiveLayout::Flat => record.display_name.clone(),
        ArchiveLayout::Nested => format!("{}{}", record.directory(), record.display_name),
    }
}

/// Distinct entry names `records` produce under `layout`
#[must_use]
pub fn entry_count(records: &[FileRecord], layout: ArchiveLayout) -> usize {
    records
        .iter()
        .map(|r| entry_name(r, layout))
        .collect::<HashSet<_>>()
        .len()
}

/// Build a zip archive of `records` in memory
///
/// # Errors
/// Returns `ExportError::Unreadable` if any included record's content cannot
/// be read, or `ExportError::Zip` if the archive cannot be assembled. No
/// bytes are returned in either case.
pub fn export_archive(records: &[FileRecord], options: &ExportOptions) -> Result<Vec<u8>> {
    let names: Vec<String> = records.iter().map(|r| entry_name(r, options.layout)).collect();

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        if last_index.insert(name.as_str(), i).is_some() {
            log::warn!("duplicate entry name '{name}', keeping the last one");
        }
    }

    let base = SimpleFileOptions::default()
        .compression_method(options.compression.into())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (i, (record, name)) in records.iter().zip(&names).enumerate() {
        if last_index.get(name.as_str()) != Some(&i) {
            continue;
        }
        let bytes = record
            .content
            .read_bytes()
            .map_err(|source| ExportError::Unreadable {
                name: record.relative_path.clone(),
                source,
            })?;

        let mut entry_options = base;
        if let Some(modified) = record.last_modified.and_then(|m| zip_timestamp(&m.with_timezone(&Local))) {
            entry_options = entry_options.last_modified_time(modified);
        }

        zip.start_file(name.as_str(), entry_options)?;
        zip.write_all(&bytes).map_err(ZipError::Io)?;
        log::debug!("added '{name}' ({} bytes)", bytes.len());
    }

    Ok(zip.finish()?.into_inner())
}

/// Write a finished archive to `path`
///
/// The bytes go to a sibling `.part` file first and are moved into place
/// only once fully written.
///
/// # Errors
/// Returns `ExportError::Write` if the file cannot be written or moved.
pub fn write_archive(bytes: &[u8], path: &Path) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&partial, bytes).map_err(write_err)?;
    fs::rename(&partial, path).map_err(|source| {
        let _ = fs::remove_file(&partial);
        write_err(source)
    })
}

fn zip_timestamp<T: Datelike + Timelike>(t: &T) -> Option<zip::DateTime> {
    zip::DateTime::from_date_and_time(
        u16::try_from(t.year()).ok()?,
        u8::try_from(t.month()).ok()?,
        u8::try_from(t.day()).ok()?,
        u8::try_from(t.hour()).ok()?,
        u8::try_from(t.minute()).ok()?,
        u8::try_from(t.second()).ok()?,
    )
    .ok()
}
