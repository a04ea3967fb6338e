//! Broadcast cancellation for every task taking part in a run.
//!
//! [`CancellationSignal`] wraps a [`CancellationToken`]: it is monotone (once
//! signalled it never resets), idempotent, and every clone observes the same
//! state. Waiting on it is a suspension point, not a polling loop, so it can be
//! raced against queue operations inside a single `tokio::select!`.
//!
//! External triggers (OS signals, timeouts) are attached with
//! [`CancellationSignal::spawn_trigger`], which dedicates one task to turning
//! the event into a single `signal()` call.

use core::{future::Future, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Shareable, write-once "stop starting new work" flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal. Only the first call has an effect; later calls,
    /// including concurrent ones or calls after the pool is gone, are no-ops.
    pub fn signal(&self) {
        self.token.cancel();
    }

    /// Non-blocking check, `true` forever after the first [`signal`].
    ///
    /// [`signal`]: Self::signal
    pub fn is_signaled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal is raised, immediately if it already was.
    ///
    /// The returned future is cancel-safe and can be used as a
    /// `tokio::select!` branch.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Spawns the listener that converts `trigger` into one call to
    /// [`signal`](Self::signal).
    ///
    /// The listener also exits, without consuming `trigger` any further, once
    /// the signal is raised by someone else. Abort the returned handle to
    /// detach the trigger early.
    pub fn spawn_trigger<F>(&self, trigger: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = trigger => {
                    token.cancel();
                }
            }
        })
    }

    /// Derives a timeout: the signal is raised once `after` has elapsed.
    pub fn signal_after(&self, after: Duration) -> JoinHandle<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Run deadline set to {after:?}");

        self.spawn_trigger(async move {
            tokio::time::sleep(after).await;

            #[cfg(feature = "tracing")]
            tracing::warn!("Run deadline of {after:?} reached, cancelling");
        })
    }
}
