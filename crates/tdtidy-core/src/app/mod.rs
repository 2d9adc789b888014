//! App - アプリケーション層
//!
//! ports と policy を組み合わせて lifecycle 遷移を実行します。
//!
//! # 主要コンポーネント
//! - **fetch**: list のページを読み切ってから describe する列挙
//! - **Orchestrator**: fetch → select → (dry-run 報告 | 変更 + pace) → 報告
//! - **TransitionReport**: 1 遷移分の結果と出力行

pub mod fetch;
pub mod orchestrator;
pub mod report;

// 主要な型を再エクスポート
pub use self::fetch::fetch_revisions;
pub use self::orchestrator::Orchestrator;
pub use self::report::TransitionReport;
