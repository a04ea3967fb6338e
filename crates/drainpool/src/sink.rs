//! Downstream store written by the persist stage.
//!
//! The pool treats the store as opaque: a [`Sink`] accepts [`Record`]s and
//! may fail. [`MemorySink`] is the in-process store used by the binary and
//! tests; it answers the two questions the reporting side asks, "what were the
//! newest N records" and "what landed since a point in time".

use crate::{Job, Result};
use parking_lot::Mutex;
use tokio::time::Instant;

/// One persisted job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub job: Job,
    pub worker_id: usize,
    pub persisted_at: Instant,
}

impl Record {
    /// Stamps `job` with the current (tokio) time.
    pub fn now(job: Job, worker_id: usize) -> Self {
        Self {
            job,
            worker_id,
            persisted_at: Instant::now(),
        }
    }
}

/// Destination for records produced by the persist stage.
pub trait Sink: Send + Sync + 'static {
    /// Stores `record`.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::Sink`](crate::Error::Sink) when the
    /// record could not be stored; the job is then counted as failed.
    fn persist(&self, record: Record) -> Result<()>;
}

/// Append-only in-memory store.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Up to `limit` records, newest first. Records persisted at the same
    /// instant are ordered by reverse insertion.
    pub fn recent(&self, limit: usize) -> Vec<Record> {
        let mut newest: Vec<_> = self.records.lock().iter().rev().cloned().collect();
        newest.sort_by(|a, b| b.persisted_at.cmp(&a.persisted_at));
        newest.truncate(limit);
        newest
    }

    /// Every record persisted at or after `cutoff`, in insertion order.
    pub fn since(&self, cutoff: Instant) -> Vec<Record> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.persisted_at >= cutoff)
            .cloned()
            .collect()
    }
}

impl Sink for MemorySink {
    fn persist(&self, record: Record) -> Result<()> {
        self.records.lock().push(record);
        Ok(())
    }
}
