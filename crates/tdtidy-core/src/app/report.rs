//! TransitionReport - 1 遷移分の結果

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{Action, Revision};

const DRY_RUN_PREFIX: &str = "[dry-run] ";

/// Outcome of one transition.
///
/// In a live run `revisions` holds the records returned by the registry after
/// the mutation. In a dry run it holds the revisions that would be acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionReport {
    pub action: Action,
    pub dry_run: bool,
    pub threshold: DateTime<Utc>,
    pub revisions: Vec<Revision>,
}

impl TransitionReport {
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// One line per revision, e.g. `Deleted: web:3` or `[dry-run] Deregistered: web:3`.
    pub fn lines(&self) -> Vec<String> {
        let prefix = if self.dry_run { DRY_RUN_PREFIX } else { "" };
        self.revisions
            .iter()
            .map(|revision| format!("{prefix}{}: {}", self.action.past_tense(), revision.name()))
            .collect()
    }
}

impl fmt::Display for TransitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
