//! Rename engine
//!
//! Name transforms are pure functions over a display name. Batch renames
//! are computed as a [`RenamePlan`] first and committed to the store in a
//! second step, so a plan is also what a dry run shows.
//!
//! A record is a *target* when it is both selected and visible under the
//! current filter. Non-targets are never touched.

use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;

use crate::record::{FileRecord, RecordId};

type Result<T> = std::result::Result<T, RenameError>;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[must_use]
pub fn to_lower(name: &str) -> String {
    name.to_lowercase()
}

#[must_use]
pub fn to_upper(name: &str) -> String {
    name.to_uppercase()
}

/// Replace every non-overlapping occurrence of `find`, scanning left to right
///
/// An empty `find` leaves the name untouched.
#[must_use]
pub fn find_replace(name: &str, find: &str, replace: &str) -> String {
    if find.is_empty() {
        return name.to_string();
    }
    name.replace(find, replace)
}

/// A batch rename operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOp {
    Lowercase,
    Uppercase,
    FindReplace { find: String, replace: String },
    RegexReplace { pattern: String, replacement: String },
}

impl RenameOp {
    /// Short human label used in summaries
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Lowercase => "Lowercase".to_string(),
            Self::Uppercase => "Uppercase".to_string(),
            Self::FindReplace { find, replace } => format!("Replace '{find}' → '{replace}'"),
            Self::RegexReplace {
                pattern,
                replacement,
            } => format!("Regex /{pattern}/ → '{replacement}'"),
        }
    }

    /// Validate the operation and prepare it for repeated application
    ///
    /// # Errors
    /// Returns `RenameError::InvalidPattern` for a regex that does not compile.
    pub fn compile(&self) -> Result<Transform<'_>> {
        Ok(match self {
            Self::Lowercase => Transform::Lower,
            Self::Uppercase => Transform::Upper,
            Self::FindReplace { find, replace } => Transform::Literal { find, replace },
            Self::RegexReplace { pattern, .. } if pattern.is_empty() => Transform::Identity,
            Self::RegexReplace {
                pattern,
                replacement,
            } => {
                let re = Regex::new(pattern).map_err(|source| RenameError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                Transform::Regex { re, replacement }
            }
        })
    }
}

/// A compiled [`RenameOp`]
#[derive(Debug)]
pub enum Transform<'a> {
    Identity,
    Lower,
    Upper,
    Literal { find: &'a str, replace: &'a str },
    Regex { re: Regex, replacement: &'a str },
}

impl Transform<'_> {
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_string(),
            Self::Lower => to_lower(name),
            Self::Upper => to_upper(name),
            Self::Literal { find, replace } => find_replace(name, find, replace),
            Self::Regex { re, replacement } => re.replace_all(name, *replacement).into_owned(),
        }
    }
}

/// One pending display-name change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameChange {
    pub id: RecordId,
    pub from: String,
    pub to: String,
}

/// Outcome of evaluating an operation against the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    /// Targets whose name changes
    pub changes: Vec<RenameChange>,
    /// Targets whose name the operation leaves as is
    pub unchanged: usize,
    /// Targets that would have ended up with an empty name; they keep their old one
    pub rejected: Vec<RecordId>,
}

impl RenamePlan {
    #[must_use]
    pub fn targets(&self) -> usize {
        self.changes.len() + self.unchanged + self.rejected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compute the effect of `op` on every target in `records`
///
/// # Errors
/// Returns `RenameError::InvalidPattern` before looking at any record if
/// the operation does not compile.
pub fn plan_rename(
    records: &[FileRecord],
    op: &RenameOp,
    selected: &HashSet<RecordId>,
    visible: &HashSet<RecordId>,
) -> Result<RenamePlan> {
    let transform = op.compile()?;
    let mut plan = RenamePlan::default();

    for record in records
        .iter()
        .filter(|r| selected.contains(&r.id) && visible.contains(&r.id))
    {
        let renamed = transform.apply(&record.display_name);
        if renamed.is_empty() {
            log::debug!("rejecting empty name for '{}'", record.display_name);
            plan.rejected.push(record.id);
        } else if renamed == record.display_name {
            plan.unchanged += 1;
        } else {
            plan.changes.push(RenameChange {
                id: record.id,
                from: record.display_name.clone(),
                to: renamed,
            });
        }
    }

    Ok(plan)
}
