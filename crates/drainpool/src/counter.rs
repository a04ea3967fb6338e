use portable_atomic::{AtomicUsize, Ordering};

/// Count of jobs whose unit of work reported success.
///
/// Workers only ever increment; the coordinator reads the final value after
/// joining every worker, so the join provides the happens-before edge and the
/// increments themselves never lose updates.
#[derive(Debug, Default)]
pub struct ProcessedCounter {
    value: AtomicUsize,
}

impl ProcessedCounter {
    pub const fn new() -> Self {
        Self {
            value: AtomicUsize::new(0),
        }
    }

    /// Records one success and returns the new total.
    pub fn increment(&self) -> usize {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn get(&self) -> usize {
        self.value.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread::scope};

    #[test]
    fn increments_from_many_threads_are_not_lost() {
        const THREADS: usize = 16;
        const PER_THREAD: usize = 10_000;

        let counter = Arc::new(ProcessedCounter::new());
        scope(|s| {
            for _ in 0..THREADS {
                let counter = Arc::clone(&counter);
                s.spawn(move || {
                    for _ in 0..PER_THREAD {
                        counter.increment();
                    }
                });
            }
        });

        assert_eq!(counter.get(), THREADS * PER_THREAD);
    }

    #[test]
    fn increment_returns_running_total() {
        let counter = ProcessedCounter::default();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
    }
}
