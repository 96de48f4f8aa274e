//! Selection and filtering
//!
//! The filter is a view: it never reorders or mutates records. The
//! selection is a plain id set; `select_all` replaces it with exactly the
//! ids that are visible at that moment.

use std::collections::HashSet;

use crate::record::{FileRecord, RecordId};

/// Case-insensitive substring match over the searchable fields of a record
///
/// An empty query matches everything.
#[must_use]
pub fn matches(record: &FileRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        Some(record.display_name.as_str()),
        Some(record.original_name.as_str()),
        record.mime_type.as_deref(),
        Some(record.relative_path.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Records visible under `query`, in store order
#[must_use]
pub fn filter<'a>(records: &'a [FileRecord], query: &str) -> Vec<&'a FileRecord> {
    records.iter().filter(|r| matches(r, query)).collect()
}

/// How much of the visible set is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Some,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<RecordId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with exactly `visible`
    pub fn select_all(&mut self, visible: impl IntoIterator<Item = RecordId>) {
        self.ids = visible.into_iter().collect();
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    /// Flip membership of `id`; returns whether it is selected afterwards
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Add ids without dropping existing members
    pub fn extend(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        self.ids.extend(ids);
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub const fn ids(&self) -> &HashSet<RecordId> {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Tri-state summary over `visible`, as shown by a header checkbox
    #[must_use]
    pub fn state_over<'a>(&self, visible: impl IntoIterator<Item = &'a FileRecord>) -> SelectionState {
        let mut total = 0;
        let mut selected = 0;
        for record in visible {
            total += 1;
            if self.ids.contains(&record.id) {
                selected += 1;
            }
        }
        match (total, selected) {
            (0, _) | (_, 0) => SelectionState::None,
            (t, s) if t == s => SelectionState::All,
            _ => SelectionState::Some,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, record_at};

    #[test]
    fn test_empty_query_matches_all() {
        let records = vec![record("a.txt"), record("b.png")];
        assert_eq!(filter(&records, "").len(), 2);
    }

    #[test]
    fn test_matches_each_field_case_insensitively() {
        let mut r = record_at("Photo.JPG", "Holiday/Photo.JPG");
        assert!(matches(&r, "photo"));
        assert!(matches(&r, "HOLIDAY"));
        assert!(matches(&r, "image/jpeg"));

        r.display_name = "renamed.jpg".into();
        assert!(matches(&r, "RENAMED"));
        assert!(matches(&r, "photo"));
        assert!(!matches(&r, "video"));
    }

    #[test]
    fn test_filter_keeps_store_order() {
        let records = vec![record("xa"), record("b"), record("ya"), record("za")];
        let names: Vec<_> = filter(&records, "a")
            .into_iter()
            .map(|r| r.original_name.as_str())
            .collect();
        assert_eq!(names, vec!["xa", "ya", "za"]);
    }

    #[test]
    fn test_select_all_replaces() {
        let records = vec![record("a"), record("b"), record("c")];
        let mut selection = Selection::new();
        selection.select_all(records.iter().map(|r| r.id));
        assert_eq!(selection.len(), 3);

        selection.select_all([records[2].id]);
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(records[2].id));
        assert!(!selection.contains(records[0].id));
    }

    #[test]
    fn test_toggle_and_deselect() {
        let r = record("a");
        let mut selection = Selection::new();
        assert!(selection.toggle(r.id));
        assert!(selection.contains(r.id));
        assert!(!selection.toggle(r.id));
        assert!(selection.is_empty());

        selection.extend([r.id]);
        selection.deselect_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_state_over_visible() {
        let records = vec![record("a"), record("b")];
        let mut selection = Selection::new();
        assert_eq!(selection.state_over(&records), SelectionState::None);
        selection.toggle(records[0].id);
        assert_eq!(selection.state_over(&records), SelectionState::Some);
        selection.toggle(records[1].id);
        assert_eq!(selection.state_over(&records), SelectionState::All);
        assert_eq!(selection.state_over(&[]), SelectionState::None);
    }
}
