//! Enumeration of registry revisions.

use tracing::debug;

use crate::domain::{LifecycleState, Revision, RevisionArn};
use crate::ports::{RegistryClient, RegistryError};

/// Enumerate every revision in `state`, fully described.
///
/// All pages are drained before the first describe call, and nothing is
/// filtered here: a family's revisions may be spread over several pages.
pub async fn fetch_revisions<R: RegistryClient + ?Sized>(
    registry: &R,
    state: LifecycleState,
    family_prefix: Option<&str>,
) -> Result<Vec<Revision>, RegistryError> {
    let mut arns: Vec<RevisionArn> = Vec::new();
    let mut next_token = None;
    let mut pages = 0usize;
    loop {
        let page = registry
            .list_revisions(state, family_prefix, next_token)
            .await?;
        pages += 1;
        arns.extend(page.arns);
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }
    debug!(%state, pages, count = arns.len(), "listed task definitions");

    let mut revisions = Vec::with_capacity(arns.len());
    for arn in &arns {
        revisions.push(registry.describe_revision(arn).await?);
    }
    Ok(revisions)
}
