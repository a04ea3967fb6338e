//! Bounded FIFO job queue with one producer and many consumers.
//!
//! The queue is a bounded [`mpsc`] channel. The single [`JobSender`] is owned
//! by the feeder and closing it consumes it, so the queue can only ever be
//! closed once. Consumers share the receiving half through [`JobReceiver`],
//! which serializes `dequeue` calls behind an async mutex; items therefore
//! leave the queue in the order they were enqueued.
//!
//! Both halves are cancel-safe: a `dequeue` or `enqueue` that loses a
//! `tokio::select!` race never loses or duplicates an item already in the
//! queue.

use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::{
    Mutex,
    mpsc::{self, error::TrySendError},
};

/// Constructor namespace for bounded job queues.
pub struct JobQueue;

impl JobQueue {
    /// Creates a queue holding at most `capacity` pending items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn bounded<T>(capacity: usize) -> Result<(JobSender<T>, JobReceiver<T>)> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity { capacity });
        }

        let (tx, rx) = mpsc::channel(capacity);
        Ok((
            JobSender { tx },
            JobReceiver {
                rx: Arc::new(Mutex::new(rx)),
            },
        ))
    }
}

/// Writing half of a [`JobQueue`]. Not cloneable: there is one producer.
#[derive(Debug)]
pub struct JobSender<T> {
    tx: mpsc::Sender<T>,
}

impl<T> JobSender<T> {
    /// Appends `item`, waiting for a free slot while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueClosed`] once every [`JobReceiver`] has been
    /// dropped; the item is discarded.
    pub async fn enqueue(&self, item: T) -> Result<()> {
        self.tx.send(item).await.map_err(|_| Error::QueueClosed {
            context: "all consumers have gone away".to_string(),
        })
    }

    /// Appends `item` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueFull`] if no slot is free, or
    /// [`Error::QueueClosed`] if every consumer is gone.
    pub fn try_enqueue(&self, item: T) -> Result<()> {
        match self.tx.try_send(item) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(Error::QueueFull {
                capacity: self.capacity(),
            }),
            Err(TrySendError::Closed(_)) => Err(Error::QueueClosed {
                context: "all consumers have gone away".to_string(),
            }),
        }
    }

    /// Number of items currently buffered.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Marks the end of input. Consumers drain what is buffered, then observe
    /// the closure as `None`.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Reading half of a [`JobQueue`], shared by every worker.
#[derive(Debug)]
pub struct JobReceiver<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for JobReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> JobReceiver<T> {
    /// Takes the oldest item, waiting while the queue is empty but open.
    ///
    /// Returns `None` once the queue is closed and fully drained.
    pub async fn dequeue(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }

    /// `true` once the sender is closed and no item is left.
    ///
    /// Reports `false` while another consumer is inside [`dequeue`], since
    /// the answer may be about to change.
    ///
    /// [`dequeue`]: Self::dequeue
    pub fn is_drained(&self) -> bool {
        self.rx
            .try_lock()
            .is_ok_and(|rx| rx.is_closed() && rx.is_empty())
    }
}
