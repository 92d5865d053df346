//! Run identifier.
//!
//! # ULID ベースの ID
//! `run` 呼び出しごとに 1 つ発行し、tracing の span と report に載せます。
//! - **時刻でソート可能**: timestamp が先頭にあるため、生成順序でソートできる
//! - **調整不要**: 複数プロセスから同時に生成しても衝突しない

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Ulid);

impl RunId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for RunId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}
