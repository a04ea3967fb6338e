#![doc = include_str!("../README.md")]

mod app;

use app::config::{CliArgs, RunConfig};
use app::shutdown::shutdown_signal;
use app::telemetry::{init_telemetry, record_run, shutdown_telemetry};
use clap::Parser;
use drainpool::{
    CancellationSignal, Coordinator, Job, MemorySink, RunSummary, StagedWork,
};
use std::sync::Arc;
use tokio::time::Instant;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    let providers = init_telemetry()?;
    log_startup_info(&config);

    let signal = CancellationSignal::new();
    let listener = signal.spawn_trigger(shutdown_signal());
    let deadline = config.timeout.map(|timeout| signal.signal_after(timeout));

    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::new(
        config.pool,
        StagedWork::new(config.stages, Arc::clone(&sink)),
    );
    let jobs = Job::numbered(&config.job_prefix, &config.job_extension, config.num_jobs);

    let start = Instant::now();
    let result = coordinator.run(jobs, &signal).await;

    // Signalling after the run is harmless, but the listeners are no longer needed.
    listener.abort();
    if let Some(deadline) = deadline {
        deadline.abort();
    }

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Run failed: {e}");
            shutdown_telemetry(providers);
            return Err(e.into());
        }
    };

    report(&summary, &sink, &config, start);
    shutdown_telemetry(providers);

    println!("{}", summary_line(&summary));
    Ok(())
}

fn summary_line(summary: &RunSummary) -> String {
    format!("All done. Total files processed: {summary}")
}

fn log_startup_info(config: &RunConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting run with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting run of {} files with {} workers",
            config.num_jobs,
            config.pool.num_workers
        );
    }
}

fn report(summary: &RunSummary, sink: &MemorySink, config: &RunConfig, start: Instant) {
    let elapsed = start.elapsed();
    let failed = summary.attempted() - summary.processed;

    if summary.cancelled {
        tracing::warn!(
            "Run interrupted after {elapsed:?}: {} enqueued, {} never fed, {failed} failed or skipped",
            summary.feed.enqueued,
            summary.feed.dropped
        );
    } else {
        tracing::info!("Run finished in {elapsed:?} with {failed} failed jobs");
    }

    let recent = Instant::now()
        .checked_sub(config.recent_window)
        .map_or_else(|| sink.len(), |cutoff| sink.since(cutoff).len());
    tracing::info!(
        "Records persisted in the last {:?}: {recent}",
        config.recent_window
    );
    if let Some(latest) = sink.recent(1).first() {
        tracing::debug!(
            "Latest record: {} (worker {})",
            latest.job,
            latest.worker_id
        );
    }

    record_run(
        summary.processed as u64,
        failed as u64,
        summary.feed.dropped as u64,
        elapsed.as_secs_f64() * 1000.0,
    );
}
