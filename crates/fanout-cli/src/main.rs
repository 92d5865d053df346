use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fanout_core::app::{CancelSignal, FailurePolicy, FanOutRunner, RunnerConfig};
use fanout_core::domain::DEFAULT_GREETING;
use fanout_core::impls::{StdoutSink, TracingSink};
use fanout_core::ports::OutputSink;

#[derive(Debug, Parser)]
#[command(name = "fanout", author, version, about = "Launch N concurrent units and wait for all of them")]
struct Cli {
    /// Number of units to launch
    #[arg(default_value_t = 10, allow_negative_numbers = true)]
    count: i64,

    /// Text placed before each index
    #[arg(long, default_value = DEFAULT_GREETING)]
    greeting: String,

    /// Exit non-zero if any unit fails
    #[arg(long)]
    fail_fast: bool,

    /// Where messages go
    #[arg(long, value_enum, default_value_t = SinkKind::Stdout)]
    sink: SinkKind,

    /// Print emitted/failed/skipped counts as JSON on stderr
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SinkKind {
    Stdout,
    Log,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let sink: Arc<dyn OutputSink> = match cli.sink {
        SinkKind::Stdout => Arc::new(StdoutSink::stdout()),
        SinkKind::Log => Arc::new(TracingSink),
    };
    let failure_policy = if cli.fail_fast {
        FailurePolicy::Fatal
    } else {
        FailurePolicy::Collect
    };

    let runner = FanOutRunner::builder()
        .sink(sink)
        .config(RunnerConfig {
            greeting: cli.greeting,
            failure_policy,
        })
        .build();

    // Ctrl-C stops units that have not started yet; running ones finish
    let cancel = CancelSignal::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling unstarted units");
                cancel.cancel();
            }
        }
    });

    let result = runner.run_until_cancelled(cli.count, &cancel).await;
    interrupt.abort();

    let report = result.context("fan-out failed")?;
    for failure in &report.failures {
        warn!(%failure, "unit reported failure");
    }
    info!(run_id = %report.run_id, "done");

    if cli.summary {
        eprintln!("{}", serde_json::to_string(&report.counts())?);
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the messages. `RUST_LOG` overrides the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
