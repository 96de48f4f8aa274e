//! Session state
//!
//! A [`Session`] owns the record store, the selection and the live filter
//! query. Front ends hold the only mutable reference and re-render from it
//! after each call; every rule about what a batch operation touches lives
//! here rather than in the presentation layer.
//!
//! ```no_run
//! use renamr::rename::RenameOp;
//! use renamr::session::Session;
//! use renamr::walker::WalkOptions;
//! # fn example() -> Result<(), renamr::RenamrError> {
//! let mut session = Session::new();
//! session.add_paths(&["photos".into()], &WalkOptions::default())?;
//! session.set_filter("jpg");
//! session.apply(&RenameOp::Lowercase)?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use crate::archive::{self, ExportOptions};
use crate::record::{FileRecord, RecordId};
use crate::rename::{self, RenameOp, RenamePlan};
use crate::selection::{self, Selection, SelectionState};
use crate::store::RecordStore;
use crate::walker::{self, Entry, WalkOptions};
use crate::RenamrError;

type Result<T> = std::result::Result<T, RenamrError>;

#[derive(Debug, Default)]
pub struct Session {
    store: RecordStore,
    selection: Selection,
    query: String,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `entries` and append them; new records start out selected
    ///
    /// Returns the number of records added.
    pub fn add_entries(&mut self, entries: &[Entry]) -> usize {
        let added = self.store.append(walker::walk(entries));
        self.selection.extend(added.iter().copied());
        log::info!("added {} record(s), {} total", added.len(), self.store.len());
        added.len()
    }

    /// Scan every path from disk and add what was found
    ///
    /// Nothing is added if any root cannot be reached.
    ///
    /// # Errors
    /// Returns `RenamrError::Walk` for the first unreadable root.
    pub fn add_paths(&mut self, paths: &[PathBuf], options: &WalkOptions) -> Result<usize> {
        let entries = paths
            .iter()
            .map(|p| walker::scan_path(p, options))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.add_entries(&entries))
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        self.store.records()
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Records matching the current filter, in store order
    #[must_use]
    pub fn visible(&self) -> Vec<&FileRecord> {
        selection::filter(self.store.records(), &self.query)
    }

    #[must_use]
    pub fn visible_ids(&self) -> HashSet<RecordId> {
        self.visible().into_iter().map(|r| r.id).collect()
    }

    /// Select exactly the visible records
    pub fn select_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.select_all(visible);
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    /// Flip selection of a record
    ///
    /// # Errors
    /// Returns `RenamrError::UnknownRecord` if `id` is not in the store.
    pub fn toggle(&mut self, id: RecordId) -> Result<bool> {
        if !self.store.contains(id) {
            return Err(RenamrError::UnknownRecord(id.to_string()));
        }
        Ok(self.selection.toggle(id))
    }

    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state_over(self.visible())
    }

    /// Records an operation would rename right now
    ///
    /// # Errors
    /// Returns `RenamrError::Rename` if the operation is invalid.
    pub fn plan(&self, op: &RenameOp) -> Result<RenamePlan> {
        Ok(rename::plan_rename(
            self.store.records(),
            op,
            self.selection.ids(),
            &self.visible_ids(),
        )?)
    }

    /// Plan and commit an operation in one step
    ///
    /// # Errors
    /// Returns `RenamrError::Rename` if the operation is invalid; the store
    /// is left untouched in that case.
    pub fn apply(&mut self, op: &RenameOp) -> Result<RenamePlan> {
        let plan = self.plan(op)?;
        self.commit(&plan);
        Ok(plan)
    }

    /// Commit a previously computed plan
    pub fn commit(&mut self, plan: &RenamePlan) -> usize {
        let renamed = self.store.commit(plan);
        if !plan.rejected.is_empty() {
            log::info!("kept {} name(s) that would have become empty", plan.rejected.len());
        }
        renamed
    }

    /// Archive every record in store order
    ///
    /// # Errors
    /// Returns `RenamrError::Export` if any content cannot be read or the
    /// archive cannot be built.
    pub fn export(&self, options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(archive::export_archive(self.store.records(), options)?)
    }

    /// Number of entries an export would hold after collisions collapse
    #[must_use]
    pub fn entry_count(&self, options: &ExportOptions) -> usize {
        archive::entry_count(self.store.records(), options.layout)
    }
}
