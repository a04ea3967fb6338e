//! Error types for the worker pool.
//!
//! This module defines the central `Error` enum. Most outcomes of a run are
//! not errors at all: a unit of work returning `false` is simply not counted,
//! and cancellation is a control signal reported through [`RunSummary`]. What
//! remains are coordination and usage failures.
//!
//! ## Error Cases
//! - `QueueClosed`: An enqueue was attempted after every reader went away.
//! - `QueueFull`: A non-blocking enqueue found no free slot.
//! - `InvalidCapacity`: A queue was requested with zero capacity.
//! - `InvalidConfig`: A pool or coordinator was configured inconsistently.
//! - `WorkerPanicked`: A worker task panicked and could not be joined.
//! - `Sink`: The persistence sink rejected a record.
//!
//! [`RunSummary`]: crate::RunSummary

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the worker pool.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The queue can no longer accept items.
    #[error("Queue closed: {context}")]
    QueueClosed { context: String },

    /// The queue has no free slot for a non-blocking enqueue.
    #[error("Queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// Bounded queues need room for at least one item.
    #[error("Invalid queue capacity: {capacity}")]
    InvalidCapacity { capacity: usize },

    /// The pool or coordinator configuration is unusable.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A worker task panicked.
    #[error("Worker {worker_id} panicked: {reason}")]
    WorkerPanicked { worker_id: usize, reason: String },

    /// The persistence sink refused a record.
    #[error("Sink error: {context}")]
    Sink { context: String },
}
