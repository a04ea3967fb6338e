use crate::{CancellationSignal, Job, JobSender};

/// What the feeder managed to hand over before closing the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Jobs accepted by the queue.
    pub enqueued: usize,
    /// Jobs never enqueued because feeding stopped early.
    pub dropped: usize,
    /// Feeding stopped before the job list was exhausted.
    pub interrupted: bool,
}

/// Pushes `jobs` into the queue in order, then closes it.
///
/// The signal is checked before every enqueue, and an enqueue that is waiting
/// for room is raced against it, so a full queue cannot keep the feeder alive
/// after cancellation. Once feeding stops, the remaining jobs are dropped for
/// good. The queue is closed exactly once on every path because `tx` is
/// consumed.
///
/// Feeding also stops if every worker has already exited and the queue
/// refuses new items.
pub async fn feed_jobs<I>(jobs: I, tx: JobSender<Job>, signal: &CancellationSignal) -> FeedReport
where
    I: IntoIterator<Item = Job>,
{
    let mut jobs = jobs.into_iter();
    let mut report = FeedReport::default();

    while let Some(job) = jobs.next() {
        let sent = if signal.is_signaled() {
            None
        } else {
            tokio::select! {
                biased;
                () = signal.cancelled() => None,
                res = tx.enqueue(job) => Some(res),
            }
        };

        match sent {
            Some(Ok(())) => {
                report.enqueued += 1;
                continue;
            }
            Some(Err(_e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Job feeding stopped: {_e}");
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::info!("Job feeding stopped due to cancellation.");
            }
        }

        report.interrupted = true;
        report.dropped = 1 + jobs.by_ref().count();
        break;
    }

    tx.close();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Feeder closed the queue after {} jobs ({} dropped)",
        report.enqueued,
        report.dropped
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobQueue;
    use core::time::Duration;

    #[tokio::test]
    async fn feeds_everything_then_closes() {
        let (tx, rx) = JobQueue::bounded(5).unwrap();
        let jobs = Job::numbered("file_", "txt", 5);
        let report = feed_jobs(jobs, tx, &CancellationSignal::new()).await;

        assert_eq!(
            report,
            FeedReport {
                enqueued: 5,
                dropped: 0,
                interrupted: false,
            }
        );

        let mut order = Vec::new();
        while let Some(job) = rx.dequeue().await {
            order.push(job.to_string());
        }
        assert_eq!(order.first().map(String::as_str), Some("file_001.txt"));
        assert_eq!(order.last().map(String::as_str), Some("file_005.txt"));
        assert!(rx.is_drained());
    }

    #[tokio::test]
    async fn cancelled_before_start_sends_nothing() {
        let (tx, rx) = JobQueue::bounded(10).unwrap();
        let signal = CancellationSignal::new();
        signal.signal();

        let report = feed_jobs(Job::numbered("file_", "txt", 10), tx, &signal).await;
        assert_eq!(report.enqueued, 0);
        assert_eq!(report.dropped, 10);
        assert!(report.interrupted);
        assert_eq!(rx.dequeue().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_unblocks_a_feeder_waiting_on_a_full_queue() {
        let (tx, rx) = JobQueue::bounded(2).unwrap();
        let signal = CancellationSignal::new();
        let _timer = signal.signal_after(Duration::from_millis(50));

        let report = feed_jobs(Job::numbered("file_", "txt", 6), tx, &signal).await;
        assert_eq!(report.enqueued, 2);
        assert_eq!(report.dropped, 4);
        assert!(report.interrupted);

        assert!(rx.dequeue().await.is_some());
        assert!(rx.dequeue().await.is_some());
        assert_eq!(rx.dequeue().await, None);
    }

    #[tokio::test]
    async fn stops_when_consumers_are_gone() {
        let (tx, rx) = JobQueue::bounded(4).unwrap();
        drop(rx);

        let jobs = Job::numbered("file_", "txt", 3);
        let report = feed_jobs(jobs, tx, &CancellationSignal::new()).await;
        assert_eq!(report.enqueued, 0);
        assert_eq!(report.dropped, 3);
        assert!(report.interrupted);
    }

    #[tokio::test]
    async fn empty_job_list() {
        let (tx, rx) = JobQueue::bounded(1).unwrap();
        let report = feed_jobs(Vec::new(), tx, &CancellationSignal::new()).await;
        assert_eq!(report, FeedReport::default());
        assert_eq!(rx.dequeue().await, None);
    }
}
