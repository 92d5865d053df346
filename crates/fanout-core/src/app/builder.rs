//! RunnerBuilder - runner の構築とワイヤリング
//!
//! # 使用例
//! ```ignore
//! let runner = FanOutRunner::builder()
//!     .sink(Arc::new(MemorySink::new()))
//!     .config(RunnerConfig { failure_policy: FailurePolicy::Fatal, ..Default::default() })
//!     .build();
//! ```
//!
//! 指定しなかった部品はデフォルト（StdoutSink, Greeter, SystemClock）になります。

use std::sync::Arc;

use super::config::RunnerConfig;
use super::runner::FanOutRunner;
use crate::impls::{Greeter, StdoutSink};
use crate::ports::{Clock, OutputSink, SystemClock, UlidGenerator, UnitOfWork};

#[derive(Default)]
pub struct RunnerBuilder {
    sink: Option<Arc<dyn OutputSink>>,
    unit: Option<Arc<dyn UnitOfWork>>,
    clock: Option<Arc<dyn Clock>>,
    config: RunnerConfig,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the default `Greeter`. `config.greeting` is ignored when set.
    pub fn unit(mut self, unit: Arc<dyn UnitOfWork>) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Clock for report timestamps and run id generation.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> FanOutRunner {
        let RunnerBuilder {
            sink,
            unit,
            clock,
            config,
        } = self;

        let sink = sink.unwrap_or_else(|| Arc::new(StdoutSink::stdout()));
        let unit = unit.unwrap_or_else(|| Arc::new(Greeter::new(config.greeting.clone())));
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));

        FanOutRunner::new(unit, sink, clock, ids, config.failure_policy)
    }
}
