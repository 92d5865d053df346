//! Errors - エラー型と分類
//!
//! # 分類
//! - `FanOutError::InvalidArgument`: 負数か MAX_UNITS 超え。spawn 前に同期的に返す（sink には何も書かない）
//! - `TaskFailure`: unit 単位の失敗。unit 境界で回収し、join 後にまとめて報告
//! - `SinkError`: ホスト側の障害。未開始の unit を止めて呼び出し元へ伝播

use serde::Serialize;
use thiserror::Error;

use super::index::TaskIndex;

/// Error returned by a `UnitOfWork` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct UnitError(String);

impl UnitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error returned by an `OutputSink` implementation.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Isolated failure of one unit (error or panic), caught at the unit boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("task {index} failed: {cause}")]
pub struct TaskFailure {
    pub index: TaskIndex,
    pub cause: String,
}

impl TaskFailure {
    pub fn new(index: TaskIndex, cause: impl Into<String>) -> Self {
        Self {
            index,
            cause: cause.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FanOutError {
    #[error("invalid task count {0}: must be between 0 and {max}", max = crate::app::runner::MAX_UNITS)]
    InvalidArgument(i64),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("{} task(s) failed: {}", .0.len(), summarize(.0))]
    TaskFailures(Vec<TaskFailure>),
}

fn summarize(failures: &[TaskFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
