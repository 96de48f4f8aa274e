//! Rename command - apply operations to collected files and export a zip

use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;

use crate::archive::{self, ExportOptions};
use crate::rename::RenameOp;
use crate::session::Session;
use crate::{RenamrError, output};

type Result<T> = std::result::Result<T, RenamrError>;

/// Execute the rename command
///
/// Operations run in order against the selected and visible records.
/// In dry-run mode the plans are printed and nothing is written.
///
/// # Errors
/// Returns `RenamrError::InvalidInput` when there is nothing to rename or
/// the confirmation prompt fails, `RenamrError::Rename` for an invalid
/// operation and `RenamrError::Export` if the archive cannot be produced.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    session: &mut Session,
    filter: Option<&str>,
    ops: &[RenameOp],
    output_path: &Path,
    options: &ExportOptions,
    dry_run: bool,
    yes: bool,
    quiet: bool,
) -> Result<()> {
    run(session, filter, ops, output_path, options, dry_run, yes, quiet, confirm_write)
}

#[allow(clippy::too_many_arguments)]
fn run(
    session: &mut Session,
    filter: Option<&str>,
    ops: &[RenameOp],
    output_path: &Path,
    options: &ExportOptions,
    dry_run: bool,
    yes: bool,
    quiet: bool,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<()> {
    if session.records().is_empty() {
        return Err(RenamrError::InvalidInput("No files found to rename".into()));
    }
    if let Some(query) = filter {
        session.set_filter(query);
    }

    for op in ops {
        let plan = session.apply(op)?;
        if dry_run {
            output::print_dry_run(&op.label(), &plan);
        } else if !quiet {
            output::print_summary(&op.label(), &plan);
        }
    }

    if dry_run {
        if !quiet {
            println!();
            output::print_table(session, quiet);
        }
        return Ok(());
    }

    // quiet only hides output; only --yes skips the prompt
    if !yes {
        let prompt = format!(
            "Write {} file(s) to '{}'?",
            session.entry_count(options),
            output_path.display()
        );
        if !confirm(&prompt)? {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    export_to(session, output_path, options, quiet)
}

fn confirm_write(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| RenamrError::InvalidInput(format!("Failed to get confirmation: {e}")))
}

/// Build the archive and write it to `path`
///
/// # Errors
/// Returns `RenamrError::Export` if building or writing fails; no file is
/// left at `path` in that case.
pub fn export_to(session: &Session, path: &Path, options: &ExportOptions, quiet: bool) -> Result<()> {
    let bytes = session.export(options)?;
    archive::write_archive(&bytes, path)?;
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    if quiet {
        println!("{}", path.display());
    } else {
        println!(
            "{} Wrote {} file(s) to {}",
            "✓".green(),
            session.entry_count(options),
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TempTree;
    use crate::walker::Entry;

    fn session() -> Session {
        let mut session = Session::new();
        session.add_entries(&[
            Entry::memory_file("Report.TXT", &b"r"[..]),
            Entry::memory_file("photo.jpg", &b"p"[..]),
        ]);
        session
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tree = TempTree::new();
        let out = tree.path().join("out.zip");
        let mut session = session();

        execute(
            &mut session,
            None,
            &[RenameOp::Lowercase],
            &out,
            &ExportOptions::default(),
            true,
            true,
            true,
        )
        .unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_execute_with_filter_writes_archive() {
        let tree = TempTree::new();
        let out = tree.path().join("out.zip");
        let mut session = session();

        execute(
            &mut session,
            Some("txt"),
            &[RenameOp::Lowercase],
            &out,
            &ExportOptions::default(),
            false,
            true,
            true,
        )
        .unwrap();

        assert!(out.exists());
        let names: Vec<_> = session.records().iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["report.txt", "photo.jpg"]);
    }

    #[test]
    fn test_empty_session_is_rejected() {
        let tree = TempTree::new();
        let mut session = Session::new();
        let err = execute(
            &mut session,
            None,
            &[],
            &tree.path().join("out.zip"),
            &ExportOptions::default(),
            false,
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, RenamrError::InvalidInput(_)));
    }

    #[test]
    fn test_quiet_without_yes_still_asks() {
        let tree = TempTree::new();
        let out = tree.file("precious.zip", "do not clobber");
        let mut session = session();
        let mut asked = false;

        run(
            &mut session,
            None,
            &[RenameOp::Lowercase],
            &out,
            &ExportOptions::default(),
            false,
            false,
            true,
            |_| {
                asked = true;
                Ok(false)
            },
        )
        .unwrap();

        assert!(asked);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "do not clobber");
    }

    #[test]
    fn test_yes_skips_prompt() {
        let tree = TempTree::new();
        let out = tree.path().join("out.zip");
        let mut session = session();

        run(
            &mut session,
            None,
            &[],
            &out,
            &ExportOptions::default(),
            false,
            true,
            false,
            |_| panic!("prompted despite --yes"),
        )
        .unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_prompt_counts_archive_entries() {
        let tree = TempTree::new();
        let mut session = Session::new();
        session.add_entries(&[
            Entry::memory_file("Dup.txt", &b"1"[..]),
            Entry::memory_file("dup.txt", &b"2"[..]),
            Entry::memory_file("other.txt", &b"3"[..]),
        ]);
        let mut prompt = String::new();

        run(
            &mut session,
            None,
            &[RenameOp::Lowercase],
            &tree.path().join("out.zip"),
            &ExportOptions::default(),
            false,
            false,
            true,
            |p| {
                prompt = p.to_string();
                Ok(false)
            },
        )
        .unwrap();
        assert!(prompt.starts_with("Write 2 file(s)"), "{prompt}");
    }
}
