//! Policy - 純粋な判定ロジック
//!
//! I/O を持たない関数だけを置きます（batch::paced を除く）。
//! - **threshold**: retention period から cutoff を計算
//! - **selector**: 対象 Revision の選別と family ごとの最新リビジョン保護
//! - **batch**: bulk 呼び出し用の分割と呼び出し間隔の制御

pub mod threshold;
pub mod selector;
pub mod batch;

pub use self::threshold::threshold;
pub use self::selector::{eligible, exclude_latest_per_family, group_by_family, is_eligible};
pub use self::batch::{DELETE_CHUNK_SIZE, chunk, paced};
