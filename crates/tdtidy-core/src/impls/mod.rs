//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryRegistry**: ページング・呼び出し記録・失敗注入つきの registry
//!
//! # 本番用実装
//! 本番用の実装は別クレートに配置します：
//! - `tdtidy-ecs`: EcsRegistry（Amazon ECS）

pub mod inmem_registry;

pub use self::inmem_registry::{CallLog, FailPoint, InMemoryRegistry};
