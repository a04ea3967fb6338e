//! Fixed-size pool of asynchronous workers draining one shared queue.
//!
//! This module defines the [`WorkerPool`] struct, which spawns a set of
//! [`worker_loop`] tasks over a single [`JobReceiver`] and joins them. There is
//! no per-worker routing: every idle worker competes for the next job, so a
//! slow job never holds up the others.
//!
//! Shutdown is cooperative. Raising the shared [`CancellationSignal`] stops
//! every worker before its next dequeue; closing the queue lets them drain and
//! exit on their own. Either way [`WorkerPool::join`] returns once all of them
//! have finished, and only then is the success counter read.
//!
//! A pool that is dropped before it has been joined, including a `join`
//! future dropped mid-way, aborts every worker it still owns.

use super::worker::{WorkerExit, WorkerStats, worker_loop};
use crate::{CancellationSignal, Error, Job, JobReceiver, ProcessedCounter, Result, UnitOfWork};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handles of the running workers plus their shared success counter.
///
/// Dropping the pool aborts any worker that has not finished yet.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerStats>>,
    processed: Arc<ProcessedCounter>,
}

impl WorkerPool {
    /// Spawns `num_workers` workers (ids `1..=num_workers`) on the current
    /// Tokio runtime.
    ///
    /// The pool takes `rx` by value: once every worker has exited, the queue
    /// has no readers left and further enqueues fail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `num_workers` is zero.
    pub fn spawn<W: UnitOfWork>(
        num_workers: usize,
        rx: JobReceiver<Job>,
        signal: &CancellationSignal,
        work: Arc<W>,
    ) -> Result<Self> {
        if num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "worker pool needs at least one worker".to_string(),
            });
        }

        let processed = Arc::new(ProcessedCounter::new());
        let handles = (1..=num_workers)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    rx.clone(),
                    signal.clone(),
                    Arc::clone(&work),
                    Arc::clone(&processed),
                ))
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!("Spawned {num_workers} workers");

        Ok(Self { handles, processed })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every worker to exit and collects their stats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerPanicked`] for the first worker (by id) whose task
    /// panicked. All workers are still awaited before returning.
    pub async fn join(mut self) -> Result<PoolReport> {
        // The handles stay owned by `self` while awaited, so dropping this
        // future aborts the workers.
        let results = futures::future::join_all(self.handles.iter_mut()).await;

        let mut workers = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(stats) => workers.push(stats),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Worker {} failed to join: {e}", index + 1);

                    return Err(Error::WorkerPanicked {
                        worker_id: index + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Every increment happened-before its worker's join.
        let processed = self.processed.get();
        debug_assert_eq!(
            processed,
            workers.iter().map(|w| w.succeeded).sum::<usize>()
        );

        #[cfg(feature = "tracing")]
        tracing::debug!("Worker pool joined, {processed} jobs succeeded");

        Ok(PoolReport { processed, workers })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Outcome of a fully joined [`WorkerPool`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolReport {
    /// Final value of the shared success counter.
    pub processed: usize,
    /// Stats for each worker, ordered by worker id.
    pub workers: Vec<WorkerStats>,
}

impl PoolReport {
    /// Total jobs handed to the unit of work, successful or not.
    pub fn attempted(&self) -> usize {
        self.workers.iter().map(|w| w.attempted).sum()
    }

    /// Number of workers that stopped because of cancellation.
    pub fn cancelled_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| w.exit == WorkerExit::Cancelled)
            .count()
    }
}
