//! Worker thread implementation

use crate::core::{PoolError, Result};
use crate::pool::shared::PoolShared;
use crate::queue::QueuedTask;
use log::{debug, error, warn};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Tasks whose `run` returned `Ok`
    pub tasks_completed: AtomicU64,
    /// Tasks whose `run` returned `Err`
    pub tasks_failed: AtomicU64,
    /// Tasks that panicked
    pub tasks_panicked: AtomicU64,
    /// Total time spent running tasks (microseconds)
    pub total_busy_time_us: AtomicU64,
}

/// Plain copy of [`WorkerStats`] at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStatSnapshot {
    /// Tasks whose `run` returned `Ok`
    pub tasks_completed: u64,
    /// Tasks whose `run` returned `Err`
    pub tasks_failed: u64,
    /// Tasks that panicked
    pub tasks_panicked: u64,
    /// Total time spent running tasks (microseconds)
    pub total_busy_time_us: u64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Get tasks completed
    pub fn get_tasks_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::Relaxed)
    }

    /// Get tasks failed
    pub fn get_tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Get tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Every task this worker dequeued, whatever the outcome
    pub fn get_tasks_run(&self) -> u64 {
        self.get_tasks_completed() + self.get_tasks_failed() + self.get_tasks_panicked()
    }

    /// Get average time per task in microseconds
    pub fn get_average_busy_time_us(&self) -> f64 {
        let total = self.total_busy_time_us.load(Ordering::Relaxed);
        let count = self.get_tasks_run();
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Take a snapshot of the counters
    pub fn snapshot(&self) -> WorkerStatSnapshot {
        WorkerStatSnapshot {
            tasks_completed: self.get_tasks_completed(),
            tasks_failed: self.get_tasks_failed(),
            tasks_panicked: self.get_tasks_panicked(),
            total_busy_time_us: self.total_busy_time_us.load(Ordering::Relaxed),
        }
    }

    fn record(&self, counter: &AtomicU64, elapsed: Duration) {
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_busy_time_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }
}

/// A thread that takes tasks from the pool's shared queue one at a time.
#[derive(Debug)]
pub(crate) struct Worker {
    id: usize,
    thread: thread::JoinHandle<()>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a worker thread named `name` bound to `shared`.
    ///
    /// The worker runs until the pool's stop flag is set. Whether it first
    /// drains tasks still queued at that point depends on the pool's
    /// shutdown policy.
    pub(crate) fn spawn(id: usize, name: String, shared: Arc<PoolShared>) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);
        let shared_clone = Arc::clone(&shared);

        shared.worker_started();
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || Self::run(id, &shared_clone, &stats_clone))
            .map_err(|e| {
                shared.worker_exited();
                PoolError::spawn(id, e)
            })?;

        Ok(Self { id, thread, stats })
    }

    /// Get worker statistics
    pub(crate) fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Block until the worker thread has exited
    pub(crate) fn join(self) -> Result<()> {
        self.thread
            .join()
            .map_err(|_| PoolError::join(self.id, "worker thread panicked"))
    }

    fn run(id: usize, shared: &PoolShared, stats: &WorkerStats) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", pool = shared.name(), id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        debug!("[{}] worker {} started", shared.name(), id);

        while let Some(mut entry) = shared.next_task() {
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::record_worker_busy(id);

            Self::execute_task(id, &mut entry, stats);

            #[cfg(feature = "tracing")]
            crate::tracing::metrics::record_worker_idle(id);
        }

        debug!(
            "[{}] worker {} stopped after {} tasks",
            shared.name(),
            id,
            stats.get_tasks_run()
        );
        shared.worker_exited();
    }

    /// Run one dequeued task, containing errors and panics
    fn execute_task(id: usize, entry: &mut QueuedTask, stats: &WorkerStats) {
        let task_id = entry.id();

        #[cfg(feature = "tracing")]
        let task_span = span!(
            Level::DEBUG,
            "task",
            task_id = task_id.value(),
            name = entry.name()
        );
        #[cfg(feature = "tracing")]
        let _task_guard = task_span.enter();

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| entry.task_mut().run()));
        let elapsed = start.elapsed();

        match outcome {
            Ok(Ok(())) => {
                stats.record(&stats.tasks_completed, elapsed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed, true);
            }
            Ok(Err(e)) => {
                warn!("worker {}: {} ({}) failed: {}", id, task_id, entry.name(), e);
                stats.record(&stats.tasks_failed, elapsed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed, false);
            }
            Err(panic_info) => {
                let panic_msg = panic_message(panic_info.as_ref());
                error!("worker {}: {} panicked: {}", id, task_id, panic_msg);
                stats.record(&stats.tasks_panicked, elapsed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_panic(elapsed);
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClosureTask, PoolError};
    use crate::pool::thread_pool::ShutdownPolicy;

    fn spawn_worker(shared: &Arc<PoolShared>) -> Worker {
        Worker::spawn(0, "test-worker-0".to_string(), Arc::clone(shared))
            .expect("Failed to spawn worker")
    }

    #[test]
    fn test_worker_exits_on_stop() {
        let shared = Arc::new(PoolShared::new("test", ShutdownPolicy::Drain));
        let worker = spawn_worker(&shared);
        assert_eq!(shared.live_workers(), 1);

        shared.request_stop();
        worker.join().expect("Failed to join worker");
        assert_eq!(shared.live_workers(), 0);
    }

    #[test]
    fn test_worker_runs_tasks() {
        let shared = Arc::new(PoolShared::new("test", ShutdownPolicy::Drain));
        let worker = spawn_worker(&shared);
        let stats = worker.stats();

        for _ in 0..3 {
            shared
                .push(Box::new(ClosureTask::new(|| Ok(()))))
                .expect("push");
        }

        shared.request_stop();
        worker.join().expect("Failed to join worker");

        assert_eq!(stats.get_tasks_completed(), 3);
        assert_eq!(stats.get_tasks_failed(), 0);
        assert_eq!(stats.snapshot().tasks_completed, 3);
    }

    #[test]
    fn test_worker_survives_failure_and_panic() {
        let shared = Arc::new(PoolShared::new("test", ShutdownPolicy::Drain));
        let worker = spawn_worker(&shared);
        let stats = worker.stats();

        shared
            .push(Box::new(ClosureTask::new(|| {
                Err(PoolError::other("expected failure"))
            })))
            .unwrap();
        shared
            .push(Box::new(ClosureTask::new(|| {
                panic!("Intentional panic for testing");
            })))
            .unwrap();
        shared
            .push(Box::new(ClosureTask::new(|| Ok(()))))
            .unwrap();

        shared.request_stop();
        worker.join().expect("Failed to join worker");

        assert_eq!(stats.get_tasks_failed(), 1);
        assert_eq!(stats.get_tasks_panicked(), 1);
        assert_eq!(stats.get_tasks_completed(), 1);
        assert_eq!(stats.get_tasks_run(), 3);
    }

    #[test]
    fn test_live_count_drops_when_worker_leaves_loop() {
        let shared = Arc::new(PoolShared::new("test", ShutdownPolicy::Drain));
        let worker = spawn_worker(&shared);
        assert_eq!(shared.live_workers(), 1);

        shared.request_stop();
        let start = Instant::now();
        while shared.live_workers() > 0 && start.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(shared.live_workers(), 0);
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u32), "unknown panic");
    }
}
