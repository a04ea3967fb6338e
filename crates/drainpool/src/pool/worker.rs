use crate::{CancellationSignal, Job, JobReceiver, ProcessedCounter, UnitOfWork};
use std::sync::Arc;

/// Why a worker left its loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// The cancellation signal was observed before the next dequeue.
    Cancelled,
    /// The queue was closed and every buffered job had been taken.
    Drained,
}

/// Per-worker tally returned when the worker task finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerStats {
    pub worker_id: usize,
    pub exit: WorkerExit,
    /// Jobs dequeued and handed to the unit of work.
    pub attempted: usize,
    /// Jobs for which the unit of work returned `true`.
    pub succeeded: usize,
}

enum Event {
    Cancelled,
    Job(Job),
    Drained,
}

/// Worker task: repeatedly waits for cancellation, the next job, or the end
/// of the queue, whichever comes first.
///
/// The wait is a single biased `select!`, so a raised signal always wins over
/// a buffered job and a worker never sits on an empty open queue after
/// cancellation. A job that has been dequeued always runs to completion; its
/// unit of work does its own cancellation pre-check.
///
/// # Arguments
///
/// - `worker_id`: 1-based identifier, used in logs and passed to the unit of
///   work.
/// - `rx`: Shared reading half of the job queue.
/// - `signal`: Run-wide cancellation signal.
/// - `work`: Unit of work executed for each job.
/// - `processed`: Shared success counter.
pub async fn worker_loop<W: UnitOfWork>(
    worker_id: usize,
    rx: JobReceiver<Job>,
    signal: CancellationSignal,
    work: Arc<W>,
    processed: Arc<ProcessedCounter>,
) -> WorkerStats {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    let mut attempted = 0;
    let mut succeeded = 0;

    let exit = loop {
        let event = tokio::select! {
            biased;
            () = signal.cancelled() => Event::Cancelled,
            job = rx.dequeue() => job.map_or(Event::Drained, Event::Job),
        };

        match event {
            Event::Cancelled => {
                #[cfg(feature = "tracing")]
                tracing::info!("[Worker {worker_id}] Exiting due to cancellation.");
                break WorkerExit::Cancelled;
            }
            Event::Drained => break WorkerExit::Drained,
            Event::Job(job) => {
                attempted += 1;
                if work.execute(&signal, worker_id, &job).await {
                    processed.increment();
                    succeeded += 1;
                }
            }
        }
    };

    debug_assert!(succeeded <= attempted);

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped after {attempted} jobs ({exit:?})");

    WorkerStats {
        worker_id,
        exit,
        attempted,
        succeeded,
    }
}
