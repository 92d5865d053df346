//! TaskIndex - unit の識別子
//!
//! 各 unit は spawn 時に自分の index を値で受け取ります。
//! `Copy` な newtype なので、`move` クロージャに入れた時点で独立したコピーになり、
//! ループ変数を共有参照することはありません。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of one unit inside a fan-out, in `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIndex(usize);

impl TaskIndex {
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Index source for a fan-out of `count` units: `0..count`.
    pub fn range(count: usize) -> impl Iterator<Item = TaskIndex> {
        (0..count).map(TaskIndex)
    }
}

impl From<usize> for TaskIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_yields_every_index_once() {
        let indices: Vec<usize> = TaskIndex::range(4).map(TaskIndex::get).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_range() {
        assert_eq!(TaskIndex::range(0).count(), 0);
    }

    #[test]
    fn displays_as_decimal() {
        assert_eq!(TaskIndex::new(42).to_string(), "42");
    }
}
