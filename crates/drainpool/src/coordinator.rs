use crate::{
    CancellationSignal, Error, FeedReport, Job, JobQueue, Result, UnitOfWork, WorkerPool,
    WorkerStats, feed_jobs,
};
use core::fmt;
use std::sync::Arc;

/// Sizing of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of concurrent workers.
    pub num_workers: usize,
    /// Maximum number of buffered jobs. `None` sizes the queue to the job
    /// list so the feeder never waits.
    pub queue_capacity: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: 10,
            queue_capacity: None,
        }
    }
}

/// Final report of a run, assembled after every worker has been joined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Jobs whose unit of work succeeded.
    pub processed: usize,
    /// Number of jobs handed to the run.
    pub total: usize,
    /// What the feeder handed to the queue.
    pub feed: FeedReport,
    /// Whether cancellation was raised at any point during the run.
    pub cancelled: bool,
    /// Per-worker stats, ordered by worker id.
    pub workers: Vec<WorkerStats>,
}

impl RunSummary {
    /// Jobs dequeued by a worker, successful or not.
    pub fn attempted(&self) -> usize {
        self.workers.iter().map(|w| w.attempted).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.processed, self.total)
    }
}

/// Wires the queue, the feeder and the worker pool together for one run.
///
/// ```no_run
/// # async fn demo() -> drainpool::Result<()> {
/// use drainpool::{CancellationSignal, Coordinator, Job, PoolConfig, work_fn};
///
/// let coordinator = Coordinator::new(
///     PoolConfig::default(),
///     work_fn(|_signal, _worker_id, _job| async { true }),
/// );
/// let signal = CancellationSignal::new();
/// let summary = coordinator
///     .run(Job::numbered("file_", "txt", 100), &signal)
///     .await?;
/// assert_eq!(summary.processed, 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Coordinator<W> {
    config: PoolConfig,
    work: Arc<W>,
}

impl<W: UnitOfWork> Coordinator<W> {
    pub fn new(config: PoolConfig, work: W) -> Self {
        Self::with_shared(config, Arc::new(work))
    }

    /// Like [`new`](Self::new), for a unit of work the caller keeps a handle
    /// to.
    pub fn with_shared(config: PoolConfig, work: Arc<W>) -> Self {
        Self { config, work }
    }

    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Processes `jobs` until they are exhausted or `signal` is raised.
    ///
    /// Workers are spawned before the first job is fed. The feeder runs on
    /// the calling task; the call returns only after every worker has exited,
    /// so the reported count is final. Cancellation is not an error: it shows
    /// up as [`RunSummary::cancelled`] and a lower `processed` count.
    ///
    /// Dropping the returned future before it completes aborts the workers;
    /// no job starts after that point.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if the pool has no workers.
    /// - [`Error::InvalidCapacity`] if the configured queue capacity is zero.
    /// - [`Error::WorkerPanicked`] if a worker task panicked.
    pub async fn run(&self, jobs: Vec<Job>, signal: &CancellationSignal) -> Result<RunSummary> {
        let total = jobs.len();
        if self.config.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }

        let capacity = self.config.queue_capacity.unwrap_or(total.max(1));
        let (tx, rx) = JobQueue::bounded(capacity)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Processing {total} jobs with {} workers (queue capacity {capacity})",
            self.config.num_workers
        );

        let pool = WorkerPool::spawn(
            self.config.num_workers,
            rx,
            signal,
            Arc::clone(&self.work),
        )?;
        let feed = feed_jobs(jobs, tx, signal).await;
        let report = pool.join().await?;

        let summary = RunSummary {
            processed: report.processed,
            total,
            feed,
            cancelled: signal.is_signaled(),
            workers: report.workers,
        };
        debug_assert!(summary.processed <= summary.feed.enqueued);

        #[cfg(feature = "tracing")]
        {
            if summary.cancelled {
                tracing::warn!(
                    "Run cancelled: {} of {} jobs processed, {} never enqueued",
                    summary.processed,
                    summary.total,
                    summary.feed.dropped
                );
            } else {
                tracing::info!("Run complete: {summary} jobs processed");
            }
        }

        Ok(summary)
    }
}
