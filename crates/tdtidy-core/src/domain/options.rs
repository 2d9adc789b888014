//! RetentionOptions - 1 回の実行を決めるオプション

/// Options consumed by the orchestrator for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionOptions {
    /// Report the target revisions without mutating the registry.
    pub dry_run: bool,

    /// Revisions younger than this many days are protected.
    pub retention_period_days: u32,

    /// Only revisions whose family starts with this prefix are considered.
    pub family_prefix: Option<String>,
}

impl RetentionOptions {
    pub fn new(dry_run: bool, retention_period_days: u32) -> Self {
        Self {
            dry_run,
            retention_period_days,
            family_prefix: None,
        }
    }

    /// Set the family prefix. An empty string means "no filter".
    pub fn with_family_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.family_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn family_prefix(&self) -> Option<&str> {
        self.family_prefix.as_deref()
    }
}
