//! Thread pool implementation

use crate::core::{ClosureTask, PoolError, Result, Task};
use crate::pool::shared::PoolShared;
use crate::pool::worker::{Worker, WorkerStatSnapshot, WorkerStats};
use crate::queue::TaskId;
use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// What workers do with queued tasks once shutdown has been requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Keep taking tasks until the queue is empty, then exit.
    ///
    /// Every task accepted before shutdown runs exactly once.
    #[default]
    Drain,
    /// Exit as soon as the stop flag is observed.
    ///
    /// Tasks still queued are discarded when the pool is joined and counted
    /// in [`PoolStats::tasks_discarded`].
    Immediate,
}

/// Configuration for thread pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolConfig {
    /// Number of worker threads
    pub num_threads: usize,
    /// Thread name prefix; workers are named `<prefix>-<id>`
    pub thread_name_prefix: String,
    /// Behaviour of workers after shutdown is requested
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name_prefix: "worker".to_string(),
            shutdown_policy: ShutdownPolicy::default(),
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with specified number of threads.
    ///
    /// Zero selects the number of CPUs.
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: if num_threads == 0 {
                num_cpus::get()
            } else {
                num_threads
            },
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the shutdown policy
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(PoolError::invalid_config(
                "num_threads",
                "Number of threads must be greater than 0",
            ));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(PoolError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not be empty",
            ));
        }
        Ok(())
    }
}

/// Point-in-time view of a pool's counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Tasks accepted by `submit`
    pub tasks_submitted: u64,
    /// Tasks that ran and returned `Ok`
    pub tasks_completed: u64,
    /// Tasks that ran and returned `Err`
    pub tasks_failed: u64,
    /// Tasks that panicked
    pub tasks_panicked: u64,
    /// Tasks dropped unrun at teardown
    pub tasks_discarded: u64,
    /// Tasks currently waiting in the queue
    pub tasks_queued: usize,
    /// Per-worker counters, indexed by worker id
    pub workers: Vec<WorkerStatSnapshot>,
}

/// A fixed-size pool of worker threads sharing one FIFO task queue
///
/// # Lifecycle
///
/// 1. [`start`](Self::start) spawns the configured number of workers.
/// 2. [`submit`](Self::submit) / [`execute`](Self::execute) enqueue tasks.
/// 3. [`shutdown`](Self::shutdown) sets the stop flag and wakes every idle
///    worker. It returns without waiting.
/// 4. [`join`](Self::join) waits for every worker thread to exit.
///
/// The stop flag is never cleared, so a pool cannot be restarted. Submissions
/// after shutdown are rejected with [`PoolError::ShuttingDown`].
///
/// # Example
///
/// ```rust
/// use rust_task_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = ThreadPool::with_threads(2)?;
/// pool.start()?;
///
/// for i in 0..4 {
///     pool.execute(move || {
///         let _ = i * 2;
///         Ok(())
///     })?;
/// }
///
/// pool.shutdown_and_join()?;
/// assert_eq!(pool.total_tasks_completed(), 4);
/// # Ok(())
/// # }
/// ```
pub struct ThreadPool {
    config: ThreadPoolConfig,
    shared: Arc<PoolShared>,
    workers: RwLock<Vec<Worker>>,
    stats: RwLock<Vec<Arc<WorkerStats>>>,
    /// Held by `start` while spawning and by `join` while joining.
    lifecycle: Mutex<()>,
    started: AtomicBool,
    tasks_discarded: AtomicU64,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("started", &self.started.load(Ordering::Relaxed))
            .field("stopped", &self.shared.is_stopped())
            .field("queued", &self.shared.pending())
            .finish()
    }
}

impl ThreadPool {
    /// Create a new thread pool with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ThreadPoolConfig::default())
    }

    /// Create a thread pool with specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads))
    }

    /// Create a thread pool with custom configuration
    pub fn with_config(config: ThreadPoolConfig) -> Result<Self> {
        config.validate()?;

        let shared = Arc::new(PoolShared::new(
            config.thread_name_prefix.clone(),
            config.shutdown_policy,
        ));

        Ok(Self {
            config,
            shared,
            workers: RwLock::new(Vec::new()),
            stats: RwLock::new(Vec::new()),
            lifecycle: Mutex::new(()),
            started: AtomicBool::new(false),
            tasks_discarded: AtomicU64::new(0),
        })
    }

    /// Spawn the worker threads.
    ///
    /// # Errors
    ///
    /// - `PoolError::AlreadyRunning` if called a second time
    /// - `PoolError::ShuttingDown` if the pool was already shut down
    /// - `PoolError::Spawn` if a thread could not be created. Workers spawned
    ///   before the failure are stopped and joined, and the pool stays shut down.
    pub fn start(&self) -> Result<()> {
        let _lifecycle = self.lifecycle.lock();

        if self.shared.is_stopped() {
            return Err(PoolError::shutting_down(
                self.shared.name(),
                self.shared.pending(),
            ));
        }

        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PoolError::already_running(
                self.shared.name(),
                self.config.num_threads,
            ));
        }

        // A shutdown may have landed between the first check and the exchange.
        if self.shared.is_stopped() {
            return Err(PoolError::shutting_down(
                self.shared.name(),
                self.shared.pending(),
            ));
        }

        let mut workers = Vec::with_capacity(self.config.num_threads);
        for id in 0..self.config.num_threads {
            let name = format!("{}-{}", self.config.thread_name_prefix, id);
            match Worker::spawn(id, name, Arc::clone(&self.shared)) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    self.shared.request_stop();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(e);
                }
            }
        }

        *self.stats.write() = workers.iter().map(Worker::stats).collect();
        *self.workers.write() = workers;

        info!(
            "[{}] started {} workers ({:?} shutdown)",
            self.shared.name(),
            self.config.num_threads,
            self.config.shutdown_policy
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_start(self.config.num_threads, self.shared.name());

        Ok(())
    }

    /// Submit a task to the pool and wake an idle worker.
    ///
    /// # Errors
    ///
    /// - `PoolError::NotRunning` if [`start`](Self::start) has not been called
    /// - `PoolError::ShuttingDown` if [`shutdown`](Self::shutdown) has been called
    pub fn submit<T: Task + 'static>(&self, task: T) -> Result<TaskId> {
        if !self.started.load(Ordering::Acquire) {
            return Err(PoolError::not_running(self.shared.name()));
        }

        let id = self.shared.push(Box::new(task))?;

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_submission(self.shared.pending());

        Ok(id)
    }

    /// Submit a task that runs inside the caller's current tracing span
    #[cfg(feature = "tracing")]
    pub fn submit_traced<T: Task + 'static>(&self, task: T) -> Result<TaskId> {
        self.submit(crate::tracing::TracedTask::new(task))
    }

    /// Submit a closure as a task
    pub fn execute<F>(&self, f: F) -> Result<TaskId>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit(ClosureTask::new(f))
    }

    /// Request shutdown and wake every waiting worker.
    ///
    /// Returns immediately. Tasks already running finish on their own; what
    /// happens to queued tasks is governed by [`ShutdownPolicy`]. Calling this
    /// more than once has no further effect.
    pub fn shutdown(&self) -> Result<()> {
        if self.shared.request_stop() {
            info!(
                "[{}] shutdown requested with {} tasks queued",
                self.shared.name(),
                self.shared.pending()
            );
        }
        Ok(())
    }

    /// Wait for every worker thread to exit.
    ///
    /// Under [`ShutdownPolicy::Immediate`] any tasks left in the queue are
    /// discarded once all workers are gone. Concurrent callers are serialized:
    /// a second `join` returns only after the first has joined every worker.
    ///
    /// # Errors
    ///
    /// - `PoolError::NotShutDown` if [`shutdown`](Self::shutdown) was not called
    ///   first, since workers would otherwise never exit
    /// - `PoolError::Join` if a worker thread panicked. The remaining workers
    ///   are still joined.
    pub fn join(&self) -> Result<()> {
        if !self.shared.is_stopped() {
            return Err(PoolError::not_shut_down(self.shared.name()));
        }

        let _lifecycle = self.lifecycle.lock();

        let workers = std::mem::take(&mut *self.workers.write());
        let mut first_error = None;
        for worker in workers {
            if let Err(e) = worker.join() {
                first_error.get_or_insert(e);
            }
        }

        let discarded = self.shared.discard_pending();
        if !discarded.is_empty() {
            warn!(
                "[{}] discarded {} queued tasks at shutdown (first: {})",
                self.shared.name(),
                discarded.len(),
                discarded[0]
            );
            self.tasks_discarded
                .fetch_add(discarded.len() as u64, Ordering::Relaxed);
        }

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_shutdown(
            self.total_tasks_completed(),
            self.total_tasks_failed(),
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Request shutdown and wait for every worker to exit
    pub fn shutdown_and_join(&self) -> Result<()> {
        self.shutdown()?;
        self.join()
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Get the pool configuration
    pub fn config(&self) -> &ThreadPoolConfig {
        &self.config
    }

    /// Check if the pool is started and not shut down
    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.shared.is_stopped()
    }

    /// Check if shutdown has been requested
    pub fn is_shut_down(&self) -> bool {
        self.shared.is_stopped()
    }

    /// Number of worker threads that have not exited yet
    pub fn live_workers(&self) -> usize {
        self.shared.live_workers()
    }

    /// Get current queue size
    pub fn queue_size(&self) -> usize {
        self.shared.pending()
    }

    /// Get total number of tasks accepted
    pub fn total_tasks_submitted(&self) -> u64 {
        self.shared.total_enqueued()
    }

    /// Get statistics for all workers
    pub fn get_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.stats.read().clone()
    }

    /// Get total tasks completed across all workers
    pub fn total_tasks_completed(&self) -> u64 {
        self.stats.read().iter().map(|s| s.get_tasks_completed()).sum()
    }

    /// Get total tasks failed across all workers
    pub fn total_tasks_failed(&self) -> u64 {
        self.stats.read().iter().map(|s| s.get_tasks_failed()).sum()
    }

    /// Get total tasks panicked across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        self.stats.read().iter().map(|s| s.get_tasks_panicked()).sum()
    }

    /// Get number of tasks discarded at teardown
    pub fn tasks_discarded(&self) -> u64 {
        self.tasks_discarded.load(Ordering::Relaxed)
    }

    /// Snapshot every counter
    pub fn stats(&self) -> PoolStats {
        let workers: Vec<WorkerStatSnapshot> =
            self.stats.read().iter().map(|s| s.snapshot()).collect();

        PoolStats {
            tasks_submitted: self.total_tasks_submitted(),
            tasks_completed: workers.iter().map(|w| w.tasks_completed).sum(),
            tasks_failed: workers.iter().map(|w| w.tasks_failed).sum(),
            tasks_panicked: workers.iter().map(|w| w.tasks_panicked).sum(),
            tasks_discarded: self.tasks_discarded(),
            tasks_queued: self.queue_size(),
            workers,
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if self.workers.read().is_empty() {
            return;
        }
        if let Err(e) = self.shutdown_and_join() {
            log::error!(
                "failed to shut down task pool '{}' during drop: {}",
                self.shared.name(),
                e
            );
        }
    }
}
