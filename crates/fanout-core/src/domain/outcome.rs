//! Outcome - unit ごとの結果と fan-out 全体の集計

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{SinkError, TaskFailure};
use super::ids::RunId;
use super::index::TaskIndex;
use super::message::OutputMessage;

/// What a single unit did.
#[derive(Debug)]
pub enum UnitOutcome {
    /// Message computed and written to the sink.
    Emitted(OutputMessage),

    /// Cancelled or aborted before the unit started; nothing was emitted.
    Skipped,

    /// The unit of work returned an error or panicked.
    Failed(TaskFailure),

    /// The sink rejected the write. Host-level; aborts unstarted siblings.
    SinkFailed(SinkError),
}

/// Aggregate of one fan-out, built after every unit has joined.
#[derive(Debug, Clone, Serialize)]
pub struct FanOutReport {
    pub run_id: RunId,
    pub requested: usize,

    /// Emitted messages, ordered by index (not by emission time).
    pub messages: Vec<OutputMessage>,

    /// Failures, ordered by index.
    pub failures: Vec<TaskFailure>,

    pub skipped: Vec<TaskIndex>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FanOutReport {
    pub fn new(run_id: RunId, requested: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            requested,
            messages: Vec::with_capacity(requested),
            failures: Vec::new(),
            skipped: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    pub fn messages(&self) -> &[OutputMessage] {
        &self.messages
    }

    /// Every requested unit emitted its message.
    pub fn is_complete(&self) -> bool {
        self.messages.len() == self.requested
    }

    pub fn counts(&self) -> FanOutCounts {
        FanOutCounts {
            spawned: self.requested,
            emitted: self.messages.len(),
            failed: self.failures.len(),
            skipped: self.skipped.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutCounts {
    pub spawned: usize,
    pub emitted: usize,
    pub failed: usize,
    pub skipped: usize,
}
