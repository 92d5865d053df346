//! Output message produced by one unit.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::index::TaskIndex;

pub const DEFAULT_GREETING: &str = "Hello from iteration";

/// One line of output. Derived deterministically from a `TaskIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputMessage(String);

impl OutputMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// `"{greeting} {index}"`
    pub fn greeting(greeting: &str, index: TaskIndex) -> Self {
        Self(format!("{greeting} {index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for OutputMessage {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for OutputMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
