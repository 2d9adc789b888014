//! Ports - 抽象化レイヤー
//!
//! 外部システム（task-definition registry, 時計, rate limit）への
//! インターフェースを trait として定義します。
//!
//! # 設計原則
//! - Registry client はグローバルに持たず、Orchestrator に明示的に渡す
//! - 時刻と待機は差し替え可能にして、テストで実時間を使わない

pub mod registry;
pub mod clock;
pub mod pacer;

// 主要な trait を再エクスポート
pub use self::registry::{MAX_DELETE_BATCH, RegistryClient, RegistryError, RevisionPage};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::pacer::{CountingPacer, IntervalPacer, NoopPacer, Pacer};
