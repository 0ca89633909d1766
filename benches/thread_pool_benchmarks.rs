use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_task_pool::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn started_pool(threads: usize) -> ThreadPool {
    let pool = ThreadPool::with_threads(threads).expect("Failed to create pool");
    pool.start().expect("Failed to start pool");
    pool
}

fn benchmark_pool_lifecycle(c: &mut Criterion) {
    c.bench_function("pool_start_shutdown_join", |b| {
        b.iter(|| {
            let pool = started_pool(4);
            pool.shutdown_and_join().expect("Failed to shutdown pool");
        });
    });
}

fn benchmark_task_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("task_submission");

    group.bench_function("lightweight_tasks_100", |b| {
        b.iter_batched(
            || started_pool(4),
            |pool| {
                for _ in 0..100 {
                    pool.execute(|| {
                        black_box(1 + 1);
                        Ok(())
                    })
                    .expect("Failed to submit task");
                }
                pool.shutdown_and_join().expect("Failed to shutdown pool");
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("medium_tasks_100", |b| {
        b.iter_batched(
            || started_pool(4),
            |pool| {
                for _ in 0..100 {
                    pool.execute(|| {
                        let mut sum = 0u64;
                        for i in 0..1000 {
                            sum = sum.wrapping_add(i);
                        }
                        black_box(sum);
                        Ok(())
                    })
                    .expect("Failed to submit task");
                }
                pool.shutdown_and_join().expect("Failed to shutdown pool");
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_concurrent_submission(c: &mut Criterion) {
    c.bench_function("concurrent_submission_4_producers", |b| {
        b.iter_batched(
            || Arc::new(started_pool(4)),
            |pool| {
                let handles: Vec<_> = (0..4)
                    .map(|_| {
                        let pool = Arc::clone(&pool);
                        std::thread::spawn(move || {
                            for _ in 0..25 {
                                pool.execute(|| Ok(())).expect("Failed to submit task");
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().expect("Thread panicked");
                }

                pool.shutdown_and_join().expect("Failed to shutdown pool");
            },
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(10));

    for threads in [1usize, 4, 8] {
        group.bench_function(format!("tasks_1000_{}_workers", threads), |b| {
            b.iter_batched(
                || (started_pool(threads), Arc::new(AtomicU64::new(0))),
                |(pool, counter)| {
                    for _ in 0..1000 {
                        let counter = Arc::clone(&counter);
                        pool.execute(move || {
                            counter.fetch_add(1, Ordering::Relaxed);
                            Ok(())
                        })
                        .expect("Failed to submit task");
                    }

                    pool.shutdown_and_join().expect("Failed to shutdown pool");
                    assert_eq!(counter.load(Ordering::Relaxed), 1000, "Not all tasks completed");
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pool_lifecycle,
    benchmark_task_submission,
    benchmark_concurrent_submission,
    benchmark_throughput
);
criterion_main!(benches);
