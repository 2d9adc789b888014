//! Pacer port - 外部 API の rate limit を守るための待機
//!
//! 変更系の API 呼び出し 1 回ごとに `pace()` を 1 回呼びます。
//! トークンバケットではなく固定間隔の待機で、throttling の応答には追従しません。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

/// Registry refill rate for mutating task-definition calls (1 call/second).
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_secs(1);

/// Suspends the caller between two mutating calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pace(&self);
}

#[async_trait]
impl<T: Pacer + ?Sized> Pacer for Arc<T> {
    async fn pace(&self) {
        (**self).pace().await
    }
}

/// Sleeps for a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct IntervalPacer {
    interval: Duration,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for IntervalPacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACING_INTERVAL)
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pace(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pace(&self) {}
}

/// Never waits, but remembers how many times it was asked to.
#[derive(Debug, Default)]
pub struct CountingPacer {
    count: AtomicUsize,
}

impl CountingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pace(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}
