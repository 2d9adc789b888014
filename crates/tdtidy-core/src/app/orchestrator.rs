//! Orchestrator - lifecycle 遷移の実行
//!
//! # フロー（1 遷移）
//! 1. fetch: 対象 state の Revision をすべて列挙
//! 2. select: threshold で選別（Deregister のみ family ごとの最新を除外）
//! 3. 対象ゼロなら何もしない
//! 4. dry-run なら対象を報告して終了（変更系は呼ばない、pace もしない）
//! 5. 変更系を 1 単位ずつ呼び、毎回 pace
//!
//! # Fail-fast
//! 最初のエラーで中断します。それまでに適用した変更は戻しません。

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::fetch::fetch_revisions;
use super::report::TransitionReport;
use crate::domain::{Action, RetentionOptions, Revision, RevisionArn, TidyError};
use crate::policy::{self, DELETE_CHUNK_SIZE};
use crate::ports::{Clock, Pacer, RegistryClient};

/// Drives deregister/delete transitions against one registry.
///
/// The threshold is computed once in [`Orchestrator::new`] and shared by every
/// transition this orchestrator runs.
pub struct Orchestrator<R, P> {
    registry: R,
    pacer: P,
    options: RetentionOptions,
    threshold: DateTime<Utc>,
}

impl<R: RegistryClient, P: Pacer> Orchestrator<R, P> {
    pub fn new<C: Clock + ?Sized>(
        registry: R,
        clock: &C,
        pacer: P,
        options: RetentionOptions,
    ) -> Result<Self, TidyError> {
        let threshold = policy::threshold(clock, options.retention_period_days)?;
        debug!(
            dry_run = options.dry_run,
            retention_period_days = options.retention_period_days,
            family_prefix = ?options.family_prefix,
            %threshold,
            "retention options"
        );
        Ok(Self {
            registry,
            pacer,
            options,
            threshold,
        })
    }

    pub fn threshold(&self) -> DateTime<Utc> {
        self.threshold
    }

    pub fn options(&self) -> &RetentionOptions {
        &self.options
    }

    /// Fetch and select the revisions `action` would act on.
    pub async fn select(&self, action: Action) -> Result<Vec<Revision>, TidyError> {
        let candidates = fetch_revisions(
            &self.registry,
            action.source_state(),
            self.options.family_prefix(),
        )
        .await?;

        for skipped in candidates.iter().filter(|r| r.registered_at.is_none()) {
            warn!(revision = %skipped.name(), "skipping task definition without registeredAt");
        }

        let eligible = policy::eligible(candidates, self.threshold);
        let targets = if action.keeps_latest() {
            policy::exclude_latest_per_family(eligible)
        } else {
            eligible
        };
        debug!(%action, count = targets.len(), "selected task definitions");
        Ok(targets)
    }

    /// Run one transition.
    pub async fn run(&self, action: Action) -> Result<TransitionReport, TidyError> {
        let targets = self.select(action).await?;

        let revisions = if targets.is_empty() || self.options.dry_run {
            targets
        } else {
            match action {
                Action::Deregister => self.deregister_each(&targets).await?,
                Action::Delete => self.delete_in_chunks(&targets).await?,
            }
        };

        info!(
            %action,
            dry_run = self.options.dry_run,
            count = revisions.len(),
            "transition finished"
        );
        Ok(TransitionReport {
            action,
            dry_run: self.options.dry_run,
            threshold: self.threshold,
            revisions,
        })
    }

    /// Run several transitions in order, stopping at the first error.
    pub async fn run_all(&self, actions: &[Action]) -> Result<Vec<TransitionReport>, TidyError> {
        let mut reports = Vec::with_capacity(actions.len());
        for &action in actions {
            reports.push(self.run(action).await?);
        }
        Ok(reports)
    }

    async fn deregister_each(&self, targets: &[Revision]) -> Result<Vec<Revision>, TidyError> {
        let mut updated = Vec::with_capacity(targets.len());
        for target in targets {
            let revision = policy::paced(&self.pacer, self.registry.deregister(&target.arn)).await?;
            info!(revision = %revision.name(), "deregistered task definition");
            updated.push(revision);
        }
        Ok(updated)
    }

    async fn delete_in_chunks(&self, targets: &[Revision]) -> Result<Vec<Revision>, TidyError> {
        let arns: Vec<RevisionArn> = targets.iter().map(|r| r.arn.clone()).collect();
        let mut deleted = Vec::with_capacity(targets.len());
        for chunk in policy::chunk(&arns, DELETE_CHUNK_SIZE) {
            let revisions = policy::paced(&self.pacer, self.registry.bulk_delete(&chunk)).await?;
            info!(count = revisions.len(), "deleted task definitions");
            deleted.extend(revisions);
        }
        Ok(deleted)
    }
}
