//! Action - 実行する lifecycle 遷移

use std::fmt;

use super::LifecycleState;

/// A lifecycle transition this tool can request.
///
/// Each action reads exactly one lifecycle state and invokes exactly one
/// mutating registry call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// active -> inactive, one revision per call.
    Deregister,
    /// inactive -> removed, up to `MAX_DELETE_BATCH` revisions per call.
    Delete,
}

impl Action {
    /// Run order when several actions are requested together.
    pub const ALL: [Action; 2] = [Action::Deregister, Action::Delete];

    /// The lifecycle state whose revisions this action targets.
    pub fn source_state(&self) -> LifecycleState {
        match self {
            Action::Deregister => LifecycleState::Active,
            Action::Delete => LifecycleState::Inactive,
        }
    }

    /// Whether the newest revision of each family must survive this action.
    pub fn keeps_latest(&self) -> bool {
        matches!(self, Action::Deregister)
    }

    /// Past-tense label used in report lines.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Deregister => "Deregistered",
            Action::Delete => "Deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Deregister => f.write_str("deregister"),
            Action::Delete => f.write_str("delete"),
        }
    }
}
