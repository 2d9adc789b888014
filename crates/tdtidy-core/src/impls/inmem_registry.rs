//! InMemoryRegistry - 開発用・テスト用の task-definition registry
//!
//! # 学習ポイント
//! - ページングを持つ list API の再現（next_token はオフセット文字列）
//! - 呼び出し回数の記録で「dry-run では変更系を呼ばない」ことを検証
//! - 任意の呼び出しで失敗させて fail-fast を検証

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{LifecycleState, Revision, RevisionArn};
use crate::ports::{MAX_DELETE_BATCH, RegistryClient, RegistryError, RevisionPage};

/// Default number of references per listing page.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Where an injected failure fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailPoint {
    List,
    Describe(RevisionArn),
    Deregister(RevisionArn),
    /// Fail the n-th bulk delete call (1-indexed).
    BulkDelete(usize),
}

/// Number of calls received, per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub list: usize,
    pub describe: usize,
    pub deregister: usize,
    /// Size of every bulk delete call, in call order.
    pub bulk_delete: Vec<usize>,
}

impl CallLog {
    /// Calls that change registry state.
    pub fn mutations(&self) -> usize {
        self.deregister + self.bulk_delete.len()
    }
}

struct InMemoryRegistryState {
    /// Records in listing order. Not necessarily sorted by revision.
    revisions: Vec<Revision>,
    calls: CallLog,
}

/// Registry held entirely in memory.
///
/// # 使用例
/// ```ignore
/// let registry = InMemoryRegistry::new(revisions).with_page_size(2);
/// let orchestrator = Orchestrator::new(registry, &clock, NoopPacer, options)?;
/// ```
pub struct InMemoryRegistry {
    page_size: usize,
    mutation_time: DateTime<Utc>,
    fail_on: Option<FailPoint>,
    state: Mutex<InMemoryRegistryState>,
}

impl InMemoryRegistry {
    pub fn new(revisions: Vec<Revision>) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mutation_time: Utc::now(),
            fail_on: None,
            state: Mutex::new(InMemoryRegistryState {
                revisions,
                calls: CallLog::default(),
            }),
        }
    }

    /// A page size of zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Timestamp stamped as `deregistered_at` by `deregister`.
    pub fn with_mutation_time(mut self, at: DateTime<Utc>) -> Self {
        self.mutation_time = at;
        self
    }

    pub fn with_failure(mut self, fail_on: FailPoint) -> Self {
        self.fail_on = Some(fail_on);
        self
    }

    /// Snapshot of the records still in the registry.
    pub async fn revisions(&self) -> Vec<Revision> {
        self.state.lock().await.revisions.clone()
    }

    pub async fn calls(&self) -> CallLog {
        self.state.lock().await.calls.clone()
    }

    fn injected(message: &str) -> String {
        format!("injected failure: {message}")
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistry {
    async fn list_revisions(
        &self,
        state: LifecycleState,
        family_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<RevisionPage, RegistryError> {
        let mut guard = self.state.lock().await;
        guard.calls.list += 1;

        if self.fail_on == Some(FailPoint::List) {
            return Err(RegistryError::List {
                state,
                message: Self::injected("list"),
            });
        }

        let offset = match next_token {
            Some(token) => token.parse::<usize>().map_err(|e| RegistryError::List {
                state,
                message: format!("invalid next token {token:?}: {e}"),
            })?,
            None => 0,
        };

        let matching: Vec<RevisionArn> = guard
            .revisions
            .iter()
            .filter(|r| r.state() == state)
            .filter(|r| family_prefix.is_none_or(|prefix| r.family.starts_with(prefix)))
            .map(|r| r.arn.clone())
            .collect();

        let end = (offset + self.page_size).min(matching.len());
        let arns = matching.get(offset..end).unwrap_or_default().to_vec();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(RevisionPage { arns, next_token })
    }

    async fn describe_revision(&self, arn: &RevisionArn) -> Result<Revision, RegistryError> {
        let mut guard = self.state.lock().await;
        guard.calls.describe += 1;

        if self.fail_on.as_ref() == Some(&FailPoint::Describe(arn.clone())) {
            return Err(RegistryError::Describe {
                arn: arn.clone(),
                message: Self::injected("describe"),
            });
        }

        guard
            .revisions
            .iter()
            .find(|r| &r.arn == arn)
            .cloned()
            .ok_or_else(|| RegistryError::Describe {
                arn: arn.clone(),
                message: "task definition not found".to_string(),
            })
    }

    async fn deregister(&self, arn: &RevisionArn) -> Result<Revision, RegistryError> {
        let mut guard = self.state.lock().await;
        guard.calls.deregister += 1;

        if self.fail_on.as_ref() == Some(&FailPoint::Deregister(arn.clone())) {
            return Err(RegistryError::Deregister {
                arn: arn.clone(),
                message: Self::injected("deregister"),
            });
        }

        let revision = guard
            .revisions
            .iter_mut()
            .find(|r| &r.arn == arn)
            .ok_or_else(|| RegistryError::Deregister {
                arn: arn.clone(),
                message: "task definition not found".to_string(),
            })?;

        if revision.state() == LifecycleState::Active {
            revision.deregistered_at = Some(self.mutation_time);
        }
        Ok(revision.clone())
    }

    async fn bulk_delete(&self, arns: &[RevisionArn]) -> Result<Vec<Revision>, RegistryError> {
        let mut guard = self.state.lock().await;
        guard.calls.bulk_delete.push(arns.len());

        if arns.len() > MAX_DELETE_BATCH {
            return Err(RegistryError::BatchTooLarge {
                max: MAX_DELETE_BATCH,
                got: arns.len(),
            });
        }
        if self.fail_on == Some(FailPoint::BulkDelete(guard.calls.bulk_delete.len())) {
            return Err(RegistryError::Delete {
                arns: arns.to_vec(),
                message: Self::injected("bulk delete"),
            });
        }

        let not_inactive: Vec<&RevisionArn> = arns
            .iter()
            .filter(|arn| {
                !guard
                    .revisions
                    .iter()
                    .any(|r| &r.arn == *arn && r.state() == LifecycleState::Inactive)
            })
            .collect();
        if !not_inactive.is_empty() {
            return Err(RegistryError::Delete {
                arns: arns.to_vec(),
                message: format!("not inactive or not found: {not_inactive:?}"),
            });
        }

        let (deleted, kept): (Vec<Revision>, Vec<Revision>) = std::mem::take(&mut guard.revisions)
            .into_iter()
            .partition(|r| arns.contains(&r.arn));
        guard.revisions = kept;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn fixture() -> Vec<Revision> {
        vec![
            Revision::new("arn:web:1", "web", 1)
                .with_registered_at(at(1))
                .with_deregistered_at(at(2)),
            Revision::new("arn:web:2", "web", 2).with_registered_at(at(3)),
            Revision::new("arn:worker:1", "worker", 1).with_registered_at(at(4)),
            Revision::new("arn:api:1", "api", 1).with_registered_at(at(5)),
        ]
    }

    async fn drain(
        registry: &InMemoryRegistry,
        state: LifecycleState,
        prefix: Option<&str>,
    ) -> Vec<RevisionArn> {
        let mut arns = Vec::new();
        let mut token = None;
        loop {
            let page = registry.list_revisions(state, prefix, token).await.unwrap();
            arns.extend(page.arns);
            match page.next_token {
                Some(next) => token = Some(next),
                None => return arns,
            }
        }
    }

    #[tokio::test]
    async fn list_filters_by_state_and_prefix() {
        let registry = InMemoryRegistry::new(fixture());

        let active = drain(&registry, LifecycleState::Active, None).await;
        assert_eq!(
            active,
            vec![
                RevisionArn::from("arn:web:2"),
                RevisionArn::from("arn:worker:1"),
                RevisionArn::from("arn:api:1"),
            ]
        );

        let inactive = drain(&registry, LifecycleState::Inactive, None).await;
        assert_eq!(inactive, vec![RevisionArn::from("arn:web:1")]);

        let prefixed = drain(&registry, LifecycleState::Active, Some("w")).await;
        assert_eq!(prefixed.len(), 2);
    }

    #[tokio::test]
    async fn list_paginates() {
        let registry = InMemoryRegistry::new(fixture()).with_page_size(2);

        let first = registry
            .list_revisions(LifecycleState::Active, None, None)
            .await
            .unwrap();
        assert_eq!(first.arns.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = registry
            .list_revisions(LifecycleState::Active, None, first.next_token)
            .await
            .unwrap();
        assert_eq!(second.arns, vec![RevisionArn::from("arn:api:1")]);
        assert_eq!(second.next_token, None);
        assert_eq!(registry.calls().await.list, 2);
    }

    #[tokio::test]
    async fn deregister_stamps_mutation_time() {
        let registry = InMemoryRegistry::new(fixture()).with_mutation_time(at(20));

        let updated = registry.deregister(&"arn:api:1".into()).await.unwrap();
        assert_eq!(updated.deregistered_at, Some(at(20)));
        assert_eq!(updated.state(), LifecycleState::Inactive);

        let stored = registry.describe_revision(&"arn:api:1".into()).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn bulk_delete_removes_inactive_revisions() {
        let registry = InMemoryRegistry::new(fixture());

        let deleted = registry.bulk_delete(&["arn:web:1".into()]).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(registry.revisions().await.len(), 3);
        assert_eq!(registry.calls().await.bulk_delete, vec![1]);
    }

    #[tokio::test]
    async fn bulk_delete_rejects_active_revisions() {
        let registry = InMemoryRegistry::new(fixture());

        let err = registry.bulk_delete(&["arn:web:2".into()]).await.unwrap_err();
        assert!(matches!(err, RegistryError::Delete { .. }));
        assert_eq!(registry.revisions().await.len(), 4);
    }

    #[tokio::test]
    async fn bulk_delete_rejects_oversized_batches() {
        let registry = InMemoryRegistry::new(Vec::new());
        let arns: Vec<RevisionArn> = (0..11).map(|i| RevisionArn::new(format!("arn:{i}"))).collect();

        let err = registry.bulk_delete(&arns).await.unwrap_err();
        assert!(matches!(err, RegistryError::BatchTooLarge { max: 10, got: 11 }));
    }

    #[tokio::test]
    async fn describe_unknown_arn_fails() {
        let registry = InMemoryRegistry::new(fixture());
        let err = registry
            .describe_revision(&"arn:missing:1".into())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("arn:missing:1"));
    }

    #[tokio::test]
    async fn injected_list_failure() {
        let registry = InMemoryRegistry::new(fixture()).with_failure(FailPoint::List);
        let err = registry
            .list_revisions(LifecycleState::Active, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::List { state: LifecycleState::Active, .. }
        ));
    }
}
