//! RunnerConfig - runner の設定

use crate::domain::DEFAULT_GREETING;

/// How unit failures affect the result of `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Failures are collected into the report; `run` still returns `Ok`.
    #[default]
    Collect,

    /// Any failure turns the result into `FanOutError::TaskFailures` after join.
    Fatal,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Prefix used by the default `Greeter` unit.
    pub greeting: String,
    pub failure_policy: FailurePolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}
