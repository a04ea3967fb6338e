use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use drainpool::{CancellationSignal, Coordinator, Job, JobQueue, PoolConfig, work_fn};
use tokio::runtime::Builder;

// Number of jobs pushed through the pool per benchmark iteration.
const TOTAL_JOBS: usize = 4096;

/// Benchmarks a full coordinator run with a no-op unit of work, so the cost
/// measured is queueing, dispatch and joining.
fn bench_pool(c: &mut Criterion, group_name: &str, num_workers: usize, capacity: Option<usize>) {
    let rt = Builder::new_multi_thread()
        .enable_time()
        .build()
        .expect("failed to build runtime");

    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_JOBS as u64));

    group.bench_function(format!("workers/{num_workers}"), |b| {
        let coordinator = Coordinator::new(
            PoolConfig {
                num_workers,
                queue_capacity: capacity,
            },
            work_fn(|_signal, _worker_id, job: Job| async move {
                !black_box(job).as_str().is_empty()
            }),
        );
        let jobs = Job::numbered("job_", "", TOTAL_JOBS);

        b.to_async(&rt).iter(|| async {
            let summary = coordinator
                .run(jobs.clone(), &CancellationSignal::new())
                .await
                .expect("run failed");
            black_box(summary.processed);
        });
    });

    group.finish();
}

/// Benchmarks raw enqueue/dequeue through the shared receiver.
fn bench_queue(c: &mut Criterion) {
    let rt = Builder::new_current_thread()
        .build()
        .expect("failed to build runtime");

    let mut group = c.benchmark_group("queue");
    group.throughput(Throughput::Elements(TOTAL_JOBS as u64));

    group.bench_function(format!("elems/{TOTAL_JOBS}"), |b| {
        b.to_async(&rt).iter(|| async {
            let (tx, rx) = JobQueue::bounded(TOTAL_JOBS).expect("capacity");
            for i in 0..TOTAL_JOBS {
                tx.enqueue(i).await.expect("enqueue");
            }
            tx.close();
            while let Some(item) = rx.dequeue().await {
                black_box(item);
            }
        });
    });

    group.finish();
}

fn benchmark_pool_unbounded_queue(c: &mut Criterion) {
    for workers in [1, 4, 16, 64] {
        bench_pool(c, "pool/capacity=jobs", workers, None);
    }
}

fn benchmark_pool_small_queue(c: &mut Criterion) {
    for workers in [1, 4, 16, 64] {
        bench_pool(c, "pool/capacity=8", workers, Some(8));
    }
}

criterion_group!(
    benches,
    bench_queue,
    benchmark_pool_unbounded_queue,
    benchmark_pool_small_queue,
);
criterion_main!(benches);
