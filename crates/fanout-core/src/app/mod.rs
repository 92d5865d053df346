//! App - アプリケーション層
//!
//! ports を組み合わせて fan-out を実行します。
//!
//! # 主要コンポーネント
//! - **FanOutRunner**: N 個の unit を spawn し、全完了まで待って集計する
//! - **CompletionLatch**: 完了カウンタ（wait-group）
//! - **CancelSignal**: 開始前の unit を止める best-effort なキャンセル
//! - **RunnerBuilder / RunnerConfig**: ワイヤリングと設定

pub mod builder;
pub mod cancel;
pub mod config;
pub mod latch;
pub mod runner;

pub use self::builder::RunnerBuilder;
pub use self::cancel::CancelSignal;
pub use self::config::{FailurePolicy, RunnerConfig};
pub use self::latch::{CompletionLatch, LatchGuard};
pub use self::runner::{FanOutRunner, MAX_UNITS};
