//! Pluggable units of work.
//!
//! A [`UnitOfWork`] turns one [`Job`] into a success flag. It must check the
//! [`CancellationSignal`] before doing anything and bail out with `false`
//! when the run is already cancelled; once it has started, it runs to
//! completion. There is no partial success and no retry.
//!
//! Two implementations ship with the crate:
//!
//! - [`StagedWork`] runs the fetch, validate and persist stages in order and
//!   hands a [`Record`] to a [`Sink`].
//! - [`WorkFn`] (built with [`work_fn`]) adapts an async closure.

use crate::{CancellationSignal, Job, Record, Sink};
use core::{future::Future, time::Duration};
use std::sync::Arc;
use tokio::time::sleep;

/// Contract for executing a single job on behalf of a worker.
pub trait UnitOfWork: Send + Sync + 'static {
    /// Executes `job` and reports whether every stage completed.
    ///
    /// Returns `false` without side effects if `signal` was already raised.
    fn execute(
        &self,
        signal: &CancellationSignal,
        worker_id: usize,
        job: &Job,
    ) -> impl Future<Output = bool> + Send;
}

/// How long each simulated stage blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageDurations {
    pub fetch: Duration,
    pub validate: Duration,
    pub persist: Duration,
}

impl StageDurations {
    pub const ZERO: Self = Self {
        fetch: Duration::ZERO,
        validate: Duration::ZERO,
        persist: Duration::ZERO,
    };

    pub fn total(&self) -> Duration {
        self.fetch + self.validate + self.persist
    }
}

impl Default for StageDurations {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(100),
            validate: Duration::from_millis(50),
            persist: Duration::from_millis(150),
        }
    }
}

/// Fetch, validate, then persist into a [`Sink`].
///
/// Validation rejects blank identifiers. A sink error fails the job.
#[derive(Debug)]
pub struct StagedWork<S> {
    stages: StageDurations,
    sink: Arc<S>,
}

impl<S: Sink> StagedWork<S> {
    pub fn new(stages: StageDurations, sink: Arc<S>) -> Self {
        Self { stages, sink }
    }

    pub fn stages(&self) -> StageDurations {
        self.stages
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }
}

impl<S: Sink> UnitOfWork for StagedWork<S> {
    async fn execute(&self, signal: &CancellationSignal, worker_id: usize, job: &Job) -> bool {
        if signal.is_signaled() {
            #[cfg(feature = "tracing")]
            tracing::info!("[Worker {worker_id}] Skipping {job} due to cancellation.");
            return false;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("[Worker {worker_id}] Reading {job}...");
        sleep(self.stages.fetch).await;

        #[cfg(feature = "tracing")]
        tracing::info!("[Worker {worker_id}] Validating {job}...");
        sleep(self.stages.validate).await;
        if job.as_str().trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!("[Worker {worker_id}] Rejected job with a blank identifier");
            return false;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("[Worker {worker_id}] Writing {job} to DB...");
        sleep(self.stages.persist).await;
        if let Err(_e) = self.sink.persist(Record::now(job.clone(), worker_id)) {
            #[cfg(feature = "tracing")]
            tracing::warn!("[Worker {worker_id}] Failed to persist {job}: {_e}");
            return false;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("[Worker {worker_id}] Done processing {job}.");
        true
    }
}

/// Unit of work backed by an async closure. See [`work_fn`].
#[derive(Clone, Debug)]
pub struct WorkFn<F> {
    f: F,
}

/// Wraps `f` as a [`UnitOfWork`].
///
/// The closure receives owned clones of the signal and job. The cancellation
/// pre-check is done by the wrapper, so `f` is never invoked once the signal
/// is raised.
pub fn work_fn<F, Fut>(f: F) -> WorkFn<F>
where
    F: Fn(CancellationSignal, usize, Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send,
{
    WorkFn { f }
}

impl<F, Fut> UnitOfWork for WorkFn<F>
where
    F: Fn(CancellationSignal, usize, Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send,
{
    fn execute(
        &self,
        signal: &CancellationSignal,
        worker_id: usize,
        job: &Job,
    ) -> impl Future<Output = bool> + Send {
        let run = (!signal.is_signaled())
            .then(|| (self.f)(signal.clone(), worker_id, job.clone()));
        async move {
            match run {
                Some(fut) => fut.await,
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, MemorySink, Result};
    use portable_atomic::{AtomicUsize, Ordering};

    struct RejectingSink;

    impl Sink for RejectingSink {
        fn persist(&self, _record: Record) -> Result<()> {
            Err(Error::Sink {
                context: "read-only".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn staged_work_runs_every_stage_and_persists() {
        let sink = Arc::new(MemorySink::new());
        let work = StagedWork::new(StageDurations::default(), Arc::clone(&sink));
        let signal = CancellationSignal::new();

        let start = tokio::time::Instant::now();
        assert!(work.execute(&signal, 3, &Job::from("file_001.txt")).await);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(310), "{elapsed:?}");

        let records = sink.recent(1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job.as_str(), "file_001.txt");
        assert_eq!(records[0].worker_id, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn staged_work_skips_when_already_cancelled() {
        let sink = Arc::new(MemorySink::new());
        let work = StagedWork::new(StageDurations::default(), Arc::clone(&sink));
        let signal = CancellationSignal::new();
        signal.signal();

        let start = tokio::time::Instant::now();
        assert!(!work.execute(&signal, 1, &Job::from("file_001.txt")).await);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn staged_work_is_not_preempted_mid_job() {
        let sink = Arc::new(MemorySink::new());
        let work = StagedWork::new(StageDurations::default(), Arc::clone(&sink));
        let signal = CancellationSignal::new();
        let _timer = signal.signal_after(Duration::from_millis(120));

        assert!(work.execute(&signal, 1, &Job::from("file_001.txt")).await);
        assert!(signal.is_signaled());
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn staged_work_rejects_blank_jobs() {
        let sink = Arc::new(MemorySink::new());
        let work = StagedWork::new(StageDurations::ZERO, Arc::clone(&sink));

        assert!(!work.execute(&CancellationSignal::new(), 1, &Job::from("  ")).await);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn staged_work_fails_when_sink_rejects() {
        let work = StagedWork::new(StageDurations::ZERO, Arc::new(RejectingSink));
        assert!(!work.execute(&CancellationSignal::new(), 1, &Job::from("a")).await);
    }

    #[tokio::test]
    async fn closure_is_not_invoked_after_cancellation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let work = {
            let calls = Arc::clone(&calls);
            work_fn(move |_signal, _worker_id, _job| {
                calls.fetch_add(1, Ordering::Relaxed);
                async { true }
            })
        };

        let signal = CancellationSignal::new();
        assert!(work.execute(&signal, 1, &Job::from("a")).await);

        signal.signal();
        assert!(!work.execute(&signal, 1, &Job::from("b")).await);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn default_stages_total_300ms() {
        assert_eq!(StageDurations::default().total(), Duration::from_millis(300));
        assert_eq!(StageDurations::ZERO.total(), Duration::ZERO);
    }
}
