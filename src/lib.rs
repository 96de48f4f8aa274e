//! Renamr - batch file renaming with zip export
//!
//! Files and folders are collected into an ordered store, their names are
//! rewritten by case transforms and find/replace operations applied to the
//! selected and visible subset, and the result is packed into a single zip
//! archive holding the original bytes under the new names.

use thiserror::Error;

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod record;
pub mod rename;
pub mod selection;
pub mod session;
pub mod store;
pub mod walker;

#[cfg(test)]
pub mod testing;

pub use record::{FileRecord, Payload, RecordId};
pub use session::Session;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum RenamrError {
    /// A path handed in could not be scanned
    #[error("Scan error: {0}")]
    Walk(#[from] walker::WalkError),
    /// A rename operation was invalid
    #[error("Rename error: {0}")]
    Rename(#[from] rename::RenameError),
    /// Building or writing the archive failed
    #[error("Export error: {0}")]
    Export(#[from] archive::ExportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// A record id that is not in the store
    #[error("Unknown record: {0}")]
    UnknownRecord(String),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
