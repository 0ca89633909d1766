//! Tracing integration for observability.
//!
//! Lifecycle events always go through the `log` facade. With the `tracing`
//! feature enabled, workers and tasks additionally run inside spans and emit
//! metric-style trace events.
//!
//! # Example
//!
//! ```rust,ignore
//! use rust_task_pool::prelude::*;
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env()
//!         .add_directive("rust_task_pool=debug".parse().unwrap()))
//!     .init();
//!
//! let pool = ThreadPool::with_threads(4)?;
//! pool.start()?;
//! pool.submit_traced(MyTask::new())?;
//! ```

use crate::core::{Result, Task};

/// A task wrapper that carries the submitter's tracing span into the worker.
///
/// The span current at construction time is entered around `run`, so events
/// emitted by the task nest under the request that produced it.
pub struct TracedTask<T: Task> {
    inner: T,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
}

impl<T: Task> TracedTask<T> {
    /// Wrap `task`, capturing the current span
    pub fn new(task: T) -> Self {
        Self {
            inner: task,
            #[cfg(feature = "tracing")]
            span: tracing::Span::current(),
        }
    }

    /// Wrap `task` with an explicit span
    #[cfg(feature = "tracing")]
    pub fn with_span(task: T, span: tracing::Span) -> Self {
        Self { inner: task, span }
    }
}

impl<T: Task> Task for TracedTask<T> {
    fn run(&mut self) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _guard = self.span.enter();
        self.inner.run()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Metric-style trace events.
#[cfg(feature = "tracing")]
pub mod metrics {
    use std::time::Duration;

    /// Records a task submission.
    #[inline]
    pub fn record_submission(queue_depth: usize) {
        tracing::trace!(
            counter.tasks_submitted = 1,
            gauge.queue_depth = queue_depth as i64,
            "task submitted"
        );
    }

    /// Records task completion with timing.
    #[inline]
    pub fn record_completion(duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.tasks_completed = 1,
                histogram.task_duration_ms = duration_ms,
                "task completed"
            );
        } else {
            tracing::trace!(
                counter.tasks_failed = 1,
                histogram.task_duration_ms = duration_ms,
                "task failed"
            );
        }
    }

    /// Records a task panic.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.tasks_panicked = 1,
            histogram.task_duration_ms = duration.as_millis() as u64,
            "task panicked"
        );
    }

    /// Records a worker picking up a task.
    #[inline]
    pub fn record_worker_busy(worker_id: usize) {
        tracing::trace!(gauge.workers_busy = 1, worker_id = worker_id, "worker busy");
    }

    /// Records a worker going back to waiting.
    #[inline]
    pub fn record_worker_idle(worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = -1i64,
            worker_id = worker_id,
            "worker idle"
        );
    }

    /// Records pool startup.
    #[inline]
    pub fn record_pool_start(num_workers: usize, pool: &str) {
        tracing::info!(workers = num_workers, pool = pool, "task pool started");
    }

    /// Records pool teardown.
    #[inline]
    pub fn record_pool_shutdown(tasks_completed: u64, tasks_failed: u64) {
        tracing::info!(
            tasks_completed = tasks_completed,
            tasks_failed = tasks_failed,
            "task pool joined"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureTask;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_traced_task_runs_inner() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);

        let mut traced = TracedTask::new(ClosureTask::new(move || {
            ran_clone.store(true, Ordering::SeqCst);
            Ok(())
        }));
        traced.run().expect("Task should run");

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_traced_task_keeps_name() {
        let traced = TracedTask::new(ClosureTask::with_name(|| Ok(()), "compact"));
        assert_eq!(traced.name(), "compact");
    }
}
