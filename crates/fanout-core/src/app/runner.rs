//! FanOutRunner - N 個の unit を並行に起動し、全完了を待って集計する
//!
//! # フロー
//! 1. n を検証（負数や MAX_UNITS 超えなら spawn 前に InvalidArgument）
//! 2. run 単位の abort シグナルと CompletionLatch(n) を用意
//! 3. index ごとに tokio::spawn（index は値でキャプチャ）
//! 4. latch.wait() で全 unit の完了を待つ
//! 5. JoinHandle を index 順に回収して FanOutReport にまとめる
//!
//! # unit 境界
//! - UnitOfWork のエラーと panic は TaskFailure として回収（兄弟 unit は継続）
//! - sink のエラーは abort を立てる。未開始の unit は skip、実行中の unit は最後まで走る

use std::any::Any;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::cancel::CancelSignal;
use super::config::FailurePolicy;
use super::latch::{CompletionLatch, LatchGuard};
use crate::domain::{
    FanOutError, FanOutReport, RunId, SinkError, TaskFailure, TaskIndex, UnitOutcome,
};
use crate::ports::{Clock, IdGenerator, OutputSink, UnitOfWork};

use super::builder::RunnerBuilder;

/// Largest fan-out accepted by `run`. Larger counts are `InvalidArgument`
/// and are rejected before anything is allocated or spawned.
pub const MAX_UNITS: usize = 1 << 20;

pub struct FanOutRunner {
    unit: Arc<dyn UnitOfWork>,
    sink: Arc<dyn OutputSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    policy: FailurePolicy,
}

impl FanOutRunner {
    pub fn new(
        unit: Arc<dyn UnitOfWork>,
        sink: Arc<dyn OutputSink>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            unit,
            sink,
            clock,
            ids,
            policy,
        }
    }

    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Launch `n` units and wait for all of them.
    pub async fn run(&self, n: i64) -> Result<FanOutReport, FanOutError> {
        self.run_until_cancelled(n, &CancelSignal::new()).await
    }

    /// Like `run`, but units that have not started when `cancel` fires are skipped.
    pub async fn run_until_cancelled(
        &self,
        n: i64,
        cancel: &CancelSignal,
    ) -> Result<FanOutReport, FanOutError> {
        let count = usize::try_from(n)
            .ok()
            .filter(|&count| count <= MAX_UNITS)
            .ok_or(FanOutError::InvalidArgument(n))?;

        let run_id = self.ids.generate_run_id();
        let span = info_span!("fan_out", %run_id, count);
        self.fan_out(run_id, count, cancel).instrument(span).await
    }

    async fn fan_out(
        &self,
        run_id: RunId,
        count: usize,
        cancel: &CancelSignal,
    ) -> Result<FanOutReport, FanOutError> {
        let started_at = self.clock.now();
        let abort = CancelSignal::new();
        let latch = CompletionLatch::new(count);

        let mut joins: Vec<(TaskIndex, JoinHandle<UnitOutcome>)> = Vec::with_capacity(count);
        for index in TaskIndex::range(count) {
            let unit = Unit {
                index,
                work: Arc::clone(&self.unit),
                sink: Arc::clone(&self.sink),
                cancel: cancel.clone(),
                abort: abort.clone(),
                guard: latch.guard(),
            };
            joins.push((index, tokio::spawn(unit.run().in_current_span())));
        }

        debug!(outstanding = latch.remaining(), "units spawned, waiting for completion");
        latch.wait().await;

        let mut report = FanOutReport::new(run_id, count, started_at);
        let mut sink_error: Option<SinkError> = None;

        for (index, join) in joins {
            let outcome = match join.await {
                Ok(outcome) => outcome,
                Err(err) => UnitOutcome::Failed(TaskFailure::new(index, describe_join_error(err))),
            };

            match outcome {
                UnitOutcome::Emitted(message) => report.messages.push(message),
                UnitOutcome::Skipped => report.skipped.push(index),
                UnitOutcome::Failed(failure) => {
                    warn!(%index, cause = %failure.cause, "unit failed");
                    report.failures.push(failure);
                }
                UnitOutcome::SinkFailed(err) => {
                    // first error wins; later ones are usually the same outage
                    if sink_error.is_none() {
                        sink_error = Some(err);
                    }
                    report.skipped.push(index);
                }
            }
        }
        report.finished_at = self.clock.now();

        let counts = report.counts();
        info!(
            emitted = counts.emitted,
            failed = counts.failed,
            skipped = counts.skipped,
            "fan-out complete"
        );

        if let Some(err) = sink_error {
            return Err(FanOutError::Sink(err));
        }
        if self.policy == FailurePolicy::Fatal && !report.failures.is_empty() {
            return Err(FanOutError::TaskFailures(report.failures));
        }
        Ok(report)
    }
}

/// One spawned unit. Owns its index by value and one latch guard.
struct Unit {
    index: TaskIndex,
    work: Arc<dyn UnitOfWork>,
    sink: Arc<dyn OutputSink>,
    cancel: CancelSignal,
    abort: CancelSignal,
    guard: LatchGuard,
}

impl Unit {
    async fn run(self) -> UnitOutcome {
        let Unit {
            index,
            work,
            sink,
            cancel,
            abort,
            guard: _guard,
        } = self;

        if cancel.is_cancelled() || abort.is_cancelled() {
            debug!(%index, "cancelled before start");
            return UnitOutcome::Skipped;
        }

        let message = match work.produce(index).await {
            Ok(message) => message,
            Err(err) => return UnitOutcome::Failed(TaskFailure::new(index, err.to_string())),
        };

        match sink.write(&message).await {
            Ok(()) => UnitOutcome::Emitted(message),
            Err(err) => {
                error!(%index, error = %err, "sink write failed, aborting unstarted units");
                abort.cancel();
                UnitOutcome::SinkFailed(err)
            }
        }
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_panic() {
        format!("panicked: {}", panic_message(err.into_panic()))
    } else {
        "cancelled by runtime".to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{RunnerConfig, RunnerBuilder};
    use crate::domain::{OutputMessage, UnitError};
    use crate::impls::{Greeter, MemorySink};
    use crate::ports::FixedClock;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn runner_with(sink: Arc<MemorySink>) -> FanOutRunner {
        RunnerBuilder::new().sink(sink).build()
    }

    /// Fails (or panics) for one index, greets for the rest.
    struct FlakyUnit {
        bad: TaskIndex,
        panic: bool,
    }

    #[async_trait]
    impl UnitOfWork for FlakyUnit {
        async fn produce(&self, index: TaskIndex) -> Result<OutputMessage, UnitError> {
            if index == self.bad {
                if self.panic {
                    panic!("boom at {index}");
                }
                return Err(UnitError::new("refused"));
            }
            Greeter::default().produce(index).await
        }
    }

    /// Every unit waits for all siblings; deadlocks unless units run concurrently.
    struct RendezvousUnit {
        barrier: Barrier,
    }

    #[async_trait]
    impl UnitOfWork for RendezvousUnit {
        async fn produce(&self, index: TaskIndex) -> Result<OutputMessage, UnitError> {
            self.barrier.wait().await;
            Ok(OutputMessage::greeting("met at", index))
        }
    }

    struct ClosedSink {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl OutputSink for ClosedSink {
        async fn write(&self, _message: &OutputMessage) -> Result<(), SinkError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(SinkError::Unavailable("closed".to_string()))
        }
    }

    #[rstest]
    #[case::none(0)]
    #[case::one(1)]
    #[case::seed(10)]
    #[case::many(100)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn every_index_emitted_exactly_once(#[case] n: usize) {
        let sink = Arc::new(MemorySink::new());
        let report = runner_with(sink.clone()).run(n as i64).await.unwrap();

        let emitted = sink.messages().await;
        assert_eq!(emitted.len(), n);
        assert!(report.is_complete());

        let expected: HashSet<OutputMessage> = TaskIndex::range(n)
            .map(|i| OutputMessage::greeting("Hello from iteration", i))
            .collect();
        let actual: HashSet<OutputMessage> = emitted.into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn seed_scenario_produces_ten_greetings() {
        let sink = Arc::new(MemorySink::new());
        let report = runner_with(sink.clone()).run(10).await.unwrap();

        let mut actual: Vec<String> = sink
            .messages()
            .await
            .into_iter()
            .map(OutputMessage::into_string)
            .collect();
        actual.sort();

        let mut expected: Vec<String> = (0..10).map(|i| format!("Hello from iteration {i}")).collect();
        expected.sort();
        assert_eq!(actual, expected);

        // report is ordered by index regardless of emission order
        let ordered: Vec<&str> = report.messages().iter().map(OutputMessage::as_str).collect();
        assert_eq!(ordered[0], "Hello from iteration 0");
        assert_eq!(ordered[9], "Hello from iteration 9");
    }

    #[tokio::test]
    async fn zero_units_returns_empty_report() {
        let sink = Arc::new(MemorySink::new());
        let report = runner_with(sink.clone()).run(0).await.unwrap();

        assert!(report.messages().is_empty());
        assert!(sink.is_empty().await);
    }

    #[rstest]
    #[case::negative(-1)]
    #[case::min(i64::MIN)]
    #[case::above_limit(MAX_UNITS as i64 + 1)]
    #[case::max(i64::MAX)]
    #[tokio::test]
    async fn out_of_range_count_is_rejected_before_spawning(#[case] n: i64) {
        let sink = Arc::new(MemorySink::new());
        let err = runner_with(sink.clone()).run(n).await.unwrap_err();

        assert!(matches!(err, FanOutError::InvalidArgument(v) if v == n));
        assert!(sink.is_empty().await);
    }

    #[tokio::test]
    async fn repeated_runs_produce_same_set() {
        let first = Arc::new(MemorySink::new());
        let second = Arc::new(MemorySink::new());

        runner_with(first.clone()).run(25).await.unwrap();
        runner_with(second.clone()).run(25).await.unwrap();

        let a: HashSet<_> = first.messages().await.into_iter().collect();
        let b: HashSet<_> = second.messages().await.into_iter().collect();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn units_run_concurrently() {
        let n = 8;
        let sink = Arc::new(MemorySink::new());
        let runner = RunnerBuilder::new()
            .sink(sink.clone())
            .unit(Arc::new(RendezvousUnit {
                barrier: Barrier::new(n),
            }))
            .build();

        let report = tokio::time::timeout(Duration::from_secs(5), runner.run(n as i64))
            .await
            .expect("units did not run concurrently")
            .unwrap();
        assert_eq!(report.messages().len(), n);
    }

    #[rstest]
    #[case::error(false, "refused")]
    #[case::panic(true, "panicked: boom at 3")]
    #[tokio::test]
    async fn failing_unit_is_isolated(#[case] panic: bool, #[case] cause: &str) {
        let sink = Arc::new(MemorySink::new());
        let runner = RunnerBuilder::new()
            .sink(sink.clone())
            .unit(Arc::new(FlakyUnit {
                bad: TaskIndex::new(3),
                panic,
            }))
            .build();

        let report = runner.run(10).await.unwrap();

        assert_eq!(
            report.failures,
            vec![TaskFailure::new(TaskIndex::new(3), cause)]
        );
        assert_eq!(sink.len().await, 9);
        assert!(!report.is_complete());
        assert!(
            !report
                .messages()
                .iter()
                .any(|m| m.as_str() == "Hello from iteration 3")
        );
    }

    #[tokio::test]
    async fn fatal_policy_turns_failures_into_error() {
        let sink = Arc::new(MemorySink::new());
        let runner = RunnerBuilder::new()
            .sink(sink.clone())
            .unit(Arc::new(FlakyUnit {
                bad: TaskIndex::new(0),
                panic: false,
            }))
            .config(RunnerConfig {
                failure_policy: FailurePolicy::Fatal,
                ..Default::default()
            })
            .build();

        let err = runner.run(4).await.unwrap_err();

        assert!(matches!(
            err,
            FanOutError::TaskFailures(ref failures) if failures.len() == 1 && failures[0].index == TaskIndex::new(0)
        ));
        // siblings still completed before the error was reported
        assert_eq!(sink.len().await, 3);
    }

    #[tokio::test]
    async fn pre_cancelled_run_emits_nothing() {
        let sink = Arc::new(MemorySink::new());
        let cancel = CancelSignal::new();
        cancel.cancel();

        let report = runner_with(sink.clone())
            .run_until_cancelled(10, &cancel)
            .await
            .unwrap();

        assert!(sink.is_empty().await);
        assert_eq!(report.skipped, TaskIndex::range(10).collect::<Vec<_>>());
        assert_eq!(report.counts().skipped, 10);
    }

    #[tokio::test]
    async fn sink_failure_propagates_and_aborts_unstarted_units() {
        let sink = Arc::new(ClosedSink {
            writes: AtomicUsize::new(0),
        });
        let runner = RunnerBuilder::new().sink(sink.clone()).build();

        let err = runner.run(50).await.unwrap_err();

        assert!(matches!(err, FanOutError::Sink(SinkError::Unavailable(_))));
        // current-thread runtime: unit 0 fails the write, the other 49 see the abort
        assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn report_uses_injected_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let runner = RunnerBuilder::new()
            .sink(Arc::new(MemorySink::new()))
            .clock(Arc::new(FixedClock::new(at)))
            .build();

        let report = runner.run(2).await.unwrap();

        assert_eq!(report.started_at, at);
        assert_eq!(report.finished_at, at);
        assert_eq!(
            report.run_id.as_ulid().timestamp_ms(),
            at.timestamp_millis() as u64
        );
    }

    #[test]
    fn panic_message_handles_string_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7_u8)), "unknown panic payload");
    }
}
