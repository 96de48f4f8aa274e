//! Ordered record store
//!
//! Records keep their insertion order for the whole session. The store only
//! grows: there is no removal, and display names change only through
//! [`RecordStore::commit`].

use std::collections::HashMap;

use crate::record::{FileRecord, RecordId};
use crate::rename::RenamePlan;

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<FileRecord>,
    index: HashMap<RecordId, usize>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records in order, returning the ids that were added
    ///
    /// A record whose id is already present is dropped.
    pub fn append(&mut self, records: Vec<FileRecord>) -> Vec<RecordId> {
        let mut added = Vec::with_capacity(records.len());
        for record in records {
            if self.index.contains_key(&record.id) {
                log::warn!("ignoring duplicate record id {}", record.id);
                continue;
            }
            self.index.insert(record.id, self.records.len());
            added.push(record.id);
            self.records.push(record);
        }
        added
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&FileRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply every change of a plan; returns how many records were renamed
    ///
    /// Changes with an empty target name or an unknown id are skipped.
    pub fn commit(&mut self, plan: &RenamePlan) -> usize {
        let mut renamed = 0;
        for change in &plan.changes {
            if change.to.is_empty() {
                continue;
            }
            let Some(&i) = self.index.get(&change.id) else {
                log::warn!("plan refers to unknown record {}", change.id);
                continue;
            };
            self.records[i].display_name.clone_from(&change.to);
            renamed += 1;
        }
        renamed
    }
}
