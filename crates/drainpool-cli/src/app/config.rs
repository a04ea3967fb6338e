use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use drainpool::{PoolConfig, StageDurations};

/// Runtime configuration for the `drainpool` binary.
///
/// These settings control how many simulated files are processed, how many
/// workers process them, and how long each pipeline stage takes. All values
/// are parsed from CLI arguments or environment variables (a `.env` file is
/// honoured), with defaults matching the reference workload of 100 files over
/// 10 workers.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "drainpool",
    version,
    about = "Process a batch of files through a bounded worker pool with graceful shutdown"
)]
pub struct CliArgs {
    /// Number of files to generate and process.
    ///
    /// Environment variable: `NUM_JOBS`
    #[arg(long, env = "NUM_JOBS", default_value_t = 100)]
    pub num_jobs: usize,

    /// Number of concurrent worker tasks.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 10)]
    pub num_workers: usize,

    /// Maximum number of queued files waiting for a worker.
    ///
    /// Defaults to the number of files, so feeding never blocks. Lower values
    /// make the feeder wait for workers to catch up.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Prefix of generated file names (`{prefix}{index:03}.{extension}`).
    ///
    /// Environment variable: `JOB_PREFIX`
    #[arg(long, env = "JOB_PREFIX", default_value_t = String::from("file_"))]
    pub job_prefix: String,

    /// Extension of generated file names; empty for none.
    ///
    /// Environment variable: `JOB_EXTENSION`
    #[arg(long, env = "JOB_EXTENSION", default_value_t = String::from("txt"))]
    pub job_extension: String,

    /// Simulated read time per file, in milliseconds.
    ///
    /// Environment variable: `FETCH_MS`
    #[arg(long, env = "FETCH_MS", default_value_t = 100)]
    pub fetch_ms: u64,

    /// Simulated validation time per file, in milliseconds.
    ///
    /// Environment variable: `VALIDATE_MS`
    #[arg(long, env = "VALIDATE_MS", default_value_t = 50)]
    pub validate_ms: u64,

    /// Simulated database write time per file, in milliseconds.
    ///
    /// Environment variable: `PERSIST_MS`
    #[arg(long, env = "PERSIST_MS", default_value_t = 150)]
    pub persist_ms: u64,

    /// Cancel the run after this many milliseconds, as if interrupted.
    ///
    /// Environment variable: `TIMEOUT_MS`
    #[arg(long, env = "TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Window, in seconds, for the "recently persisted" report.
    ///
    /// Environment variable: `RECENT_WINDOW_SECS`
    #[arg(long, env = "RECENT_WINDOW_SECS", default_value_t = 15 * 60)]
    pub recent_window_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub num_jobs: usize,
    pub pool: PoolConfig,
    pub job_prefix: String,
    pub job_extension: String,
    pub stages: StageDurations,
    pub timeout: Option<Duration>,
    pub recent_window: Duration,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.queue_capacity == Some(0) {
            bail!("QUEUE_CAPACITY must be greater than 0");
        }

        Ok(Self {
            num_jobs: args.num_jobs,
            pool: PoolConfig {
                num_workers: args.num_workers,
                queue_capacity: args.queue_capacity,
            },
            job_prefix: args.job_prefix,
            job_extension: args.job_extension,
            stages: StageDurations {
                fetch: Duration::from_millis(args.fetch_ms),
                validate: Duration::from_millis(args.validate_ms),
                persist: Duration::from_millis(args.persist_ms),
            },
            timeout: args.timeout_ms.map(Duration::from_millis),
            recent_window: Duration::from_secs(args.recent_window_secs),
        })
    }
}
