//! Errors - 実行単位のエラー
//!
//! # 分類
//! - 設定エラー: 外部呼び出しの前に検出（ThresholdOutOfRange）
//! - 外部呼び出しエラー: Registry（リトライしない、その時点で実行を中断）
//!
//! 対象ゼロ件はエラーではありません。

use thiserror::Error;

use crate::ports::RegistryError;

#[derive(Debug, Error)]
pub enum TidyError {
    #[error("retention period of {days} days is out of the representable time range")]
    ThresholdOutOfRange { days: u32 },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
