//! Revision - task definition の 1 リビジョン
//!
//! Registry から観測した状態のスナップショットです。
//! このクレートが Revision を作るのは「観測結果の写し」としてのみで、
//! 状態の変更は必ず RegistryClient 経由で依頼します。

use std::fmt;

use chrono::{DateTime, Utc};

/// Opaque reference to a revision (an ARN for ECS).
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevisionArn(String);

impl RevisionArn {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RevisionArn {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RevisionArn {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RevisionArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a revision.
///
/// # 状態遷移
/// - active --(deregister)--> inactive --(delete)--> removed
///
/// removed は registry から消えるので、ここでは表現しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Active,
    Inactive,
}

impl LifecycleState {
    /// Status string used by the registry API.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the task-definition registry.
///
/// `registered_at` is `None` for entries that predate timestamp tracking.
/// `deregistered_at` is `Some` exactly when the revision is inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub arn: RevisionArn,
    pub family: String,
    pub revision: u32,
    pub registered_at: Option<DateTime<Utc>>,
    pub deregistered_at: Option<DateTime<Utc>>,
}

impl Revision {
    /// Create an active revision without timestamps.
    pub fn new(arn: impl Into<RevisionArn>, family: impl Into<String>, revision: u32) -> Self {
        Self {
            arn: arn.into(),
            family: family.into(),
            revision,
            registered_at: None,
            deregistered_at: None,
        }
    }

    pub fn with_registered_at(mut self, at: DateTime<Utc>) -> Self {
        self.registered_at = Some(at);
        self
    }

    pub fn with_deregistered_at(mut self, at: DateTime<Utc>) -> Self {
        self.deregistered_at = Some(at);
        self
    }

    pub fn state(&self) -> LifecycleState {
        match self.deregistered_at {
            Some(_) => LifecycleState::Inactive,
            None => LifecycleState::Active,
        }
    }

    /// `family:revision`, the name used in every report line.
    pub fn name(&self) -> String {
        format!("{}:{}", self.family, self.revision)
    }
}
