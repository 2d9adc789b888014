//! tdtidy-core
//!
//! Retention-policy engine for task-definition revisions.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Revision, LifecycleState, Action, RetentionOptions, errors）
//! - **policy**: 純粋な判定ロジック（threshold, selector, batch）
//! - **ports**: 抽象化レイヤー（RegistryClient, Clock, Pacer）
//! - **app**: アプリケーションロジック（fetch, Orchestrator, TransitionReport）
//! - **impls**: 実装（InMemoryRegistry など開発用・テスト用）

pub mod domain;
pub mod policy;
pub mod ports;
pub mod app;
pub mod impls;

pub use self::app::{Orchestrator, TransitionReport};
pub use self::domain::{Action, LifecycleState, RetentionOptions, Revision, RevisionArn, TidyError};
