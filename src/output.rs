//! Output formatting for CLI display
//!
//! Renders the record table, rename previews and summaries. Renamed rows
//! are highlighted so the mapping from old to new names stands out.

use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::record::FileRecord;
use crate::rename::RenamePlan;
use crate::selection::SelectionState;
use crate::session::Session;

/// Rows shown in a dry-run preview before truncating
const PREVIEW_LIMIT: usize = 20;

/// Human readable size (binary units)
#[must_use]
pub fn format_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

#[must_use]
pub fn format_modified(modified: Option<DateTime<Utc>>) -> String {
    modified.map_or_else(
        || "-".to_string(),
        |m| m.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[must_use]
pub fn format_type(record: &FileRecord) -> &str {
    record.mime_type.as_deref().unwrap_or("Unknown")
}

/// One table row; `row` is the 1-based position among visible records
#[must_use]
pub fn record_row(row: usize, record: &FileRecord, selected: bool, quiet: bool) -> String {
    if quiet {
        return record.display_name.clone();
    }

    let mark = if selected { "[x]" } else { "[ ]" };
    let new_name = if record.is_renamed() {
        record.display_name.green().bold().to_string()
    } else {
        record.display_name.clone()
    };
    format!(
        "{mark} {row:>3}. {} → {}  ({}, {}, {})  {}",
        record.original_name,
        new_name,
        format_type(record),
        format_size(record.size_bytes),
        format_modified(record.last_modified),
        record.relative_path.dimmed(),
    )
}

fn header_mark(state: SelectionState) -> &'static str {
    match state {
        SelectionState::None => "[ ]",
        SelectionState::Some => "[-]",
        SelectionState::All => "[x]",
    }
}

/// Print the visible records of a session as a table
pub fn print_table(session: &Session, quiet: bool) {
    let visible = session.visible();

    if !quiet {
        let filter = if session.query().is_empty() {
            String::new()
        } else {
            format!(" matching '{}'", session.query().cyan())
        };
        println!(
            "{} {} of {} file(s){filter}, {} selected",
            header_mark(session.selection_state()),
            visible.len(),
            session.records().len(),
            session.selection().len(),
        );
    }

    if visible.is_empty() && !quiet {
        if session.records().is_empty() {
            println!("  No files yet. Add files or folders to get started.");
        } else {
            println!("  No files match the current filter.");
        }
        return;
    }

    for (i, record) in visible.iter().enumerate() {
        println!(
            "{}",
            record_row(i + 1, record, session.selection().contains(record.id), quiet)
        );
    }
}

/// Print what a plan would do without applying it
pub fn print_dry_run(label: &str, plan: &RenamePlan) {
    println!("{}", "=== Dry Run Mode ===".yellow().bold());
    println!(
        "{label}: would rename {} of {} targeted file(s)",
        plan.changes.len(),
        plan.targets()
    );
    if !plan.changes.is_empty() {
        println!("\n{}", "Renames:".bold());
    }
    for (i, change) in plan.changes.iter().enumerate().take(PREVIEW_LIMIT) {
        println!("  {}. {} → {}", i + 1, change.from, change.to.cyan());
    }
    if plan.changes.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", plan.changes.len() - PREVIEW_LIMIT);
    }
    if !plan.rejected.is_empty() {
        println!(
            "{}",
            format!("  {} name(s) would become empty and are kept", plan.rejected.len()).yellow()
        );
    }
    println!("\n{}", "Run without --dry-run to apply changes.".yellow());
}

/// Print the result of an applied plan
pub fn print_summary(label: &str, plan: &RenamePlan) {
    println!("\n{}", format!("=== {label} Summary ===").bold());
    println!("  {} {}", "✓ Renamed:".green(), plan.changes.len());
    if plan.unchanged > 0 {
        println!("  {} {}", "⊘ Unchanged:".yellow(), plan.unchanged);
    }
    if !plan.rejected.is_empty() {
        println!("  {} {}", "✗ Kept (empty result):".red(), plan.rejected.len());
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    record: &'a FileRecord,
    selected: bool,
    renamed: bool,
}

/// Visible records as pretty JSON
///
/// # Errors
/// Returns `serde_json::Error` if serialization fails.
pub fn records_json(session: &Session) -> serde_json::Result<String> {
    let rows: Vec<_> = session
        .visible()
        .into_iter()
        .map(|record| JsonRow {
            record,
            selected: session.selection().contains(record.id),
            renamed: record.is_renamed(),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}
