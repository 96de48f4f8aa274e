//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and drives a [`Session`].

pub mod config;
pub mod list;
pub mod rename;
pub mod shell;

use std::path::PathBuf;

use crate::session::Session;
use crate::walker::WalkOptions;
use crate::RenamrError;

// Re-export execute functions for convenience
pub use config::execute as config;
pub use list::execute as list;
pub use rename::execute as rename;
pub use shell::execute as shell;

type Result<T> = std::result::Result<T, RenamrError>;

/// Start a session holding everything found under `paths`
///
/// # Errors
/// Returns `RenamrError::Walk` if any path cannot be reached.
pub fn collect(paths: &[PathBuf], options: &WalkOptions, quiet: bool) -> Result<Session> {
    let mut session = Session::new();
    let added = session.add_paths(paths, options)?;
    if !quiet {
        println!("Collected {added} file(s) from {} path(s)", paths.len());
    }
    Ok(session)
}
