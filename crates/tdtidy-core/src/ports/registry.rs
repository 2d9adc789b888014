//! RegistryClient port - task-definition registry
//!
//! 本番実装は `tdtidy-ecs` クレート（Amazon ECS）、
//! テスト用は `impls::InMemoryRegistry` です。

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{LifecycleState, Revision, RevisionArn};

/// Hard ceiling on references per `bulk_delete` call.
pub const MAX_DELETE_BATCH: usize = 10;

/// One page of a revision listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionPage {
    pub arns: Vec<RevisionArn>,
    /// `None` on the last page.
    pub next_token: Option<String>,
}

/// Errors raised by a registry client.
///
/// The orchestrator treats every variant as fatal to the run.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to list {state} task definitions: {message}")]
    List {
        state: LifecycleState,
        message: String,
    },

    #[error("failed to describe task definition {arn}: {message}")]
    Describe { arn: RevisionArn, message: String },

    #[error("failed to deregister task definition {arn}: {message}")]
    Deregister { arn: RevisionArn, message: String },

    #[error("failed to delete {} task definitions: {message}", .arns.len())]
    Delete {
        arns: Vec<RevisionArn>,
        message: String,
    },

    #[error("bulk delete accepts at most {max} task definitions, got {got}")]
    BatchTooLarge { max: usize, got: usize },

    #[error("malformed task definition record: {0}")]
    Malformed(String),
}

/// Access to the task-definition registry.
///
/// # 契約
/// - `list_revisions` は 1 ページ分だけ返す（全ページの読み切りは呼び出し側）
/// - `describe_revision` はタイムスタンプを含む完全な Revision を返す
/// - `deregister` / `bulk_delete` は遷移後の Revision を返す
/// - `bulk_delete` に渡す参照は `MAX_DELETE_BATCH` 件まで
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn list_revisions(
        &self,
        state: LifecycleState,
        family_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<RevisionPage, RegistryError>;

    async fn describe_revision(&self, arn: &RevisionArn) -> Result<Revision, RegistryError>;

    async fn deregister(&self, arn: &RevisionArn) -> Result<Revision, RegistryError>;

    async fn bulk_delete(&self, arns: &[RevisionArn]) -> Result<Vec<Revision>, RegistryError>;
}

#[async_trait]
impl<T: RegistryClient + ?Sized> RegistryClient for Arc<T> {
    async fn list_revisions(
        &self,
        state: LifecycleState,
        family_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<RevisionPage, RegistryError> {
        (**self).list_revisions(state, family_prefix, next_token).await
    }

    async fn describe_revision(&self, arn: &RevisionArn) -> Result<Revision, RegistryError> {
        (**self).describe_revision(arn).await
    }

    async fn deregister(&self, arn: &RevisionArn) -> Result<Revision, RegistryError> {
        (**self).deregister(arn).await
    }

    async fn bulk_delete(&self, arns: &[RevisionArn]) -> Result<Vec<Revision>, RegistryError> {
        (**self).bulk_delete(arns).await
    }
}
