//! State shared between the pool handle and its workers.

use crate::core::{BoxedTask, PoolError, Result};
use crate::pool::thread_pool::ShutdownPolicy;
use crate::queue::{QueuedTask, TaskId, TaskQueue};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Everything guarded by the pool lock.
#[derive(Debug, Default)]
struct PoolState {
    queue: TaskQueue,
    /// Set once, never cleared.
    stop: bool,
}

/// The queue, the stop flag, and the wake condition workers sleep on.
///
/// One instance exists per pool and is handed to every worker behind an
/// `Arc`. The queue and the stop flag live in the same mutex, so a worker
/// checking "empty and not stopped" and a producer changing either one can
/// never interleave.
#[derive(Debug)]
pub(crate) struct PoolShared {
    name: String,
    policy: ShutdownPolicy,
    state: Mutex<PoolState>,
    wake: Condvar,
    /// Worker threads that have been spawned and not yet left their loop.
    live_workers: AtomicUsize,
}

impl PoolShared {
    pub(crate) fn new(name: impl Into<String>, policy: ShutdownPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            state: Mutex::new(PoolState::default()),
            wake: Condvar::new(),
            live_workers: AtomicUsize::new(0),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a task unless the pool has been told to stop.
    pub(crate) fn push(&self, task: BoxedTask) -> Result<TaskId> {
        let id = {
            let mut state = self.state.lock();
            if state.stop {
                return Err(PoolError::shutting_down(&self.name, state.queue.len()));
            }
            state.queue.enqueue(task)
        };

        self.wake.notify_one();
        Ok(id)
    }

    /// Flip the stop flag and wake every waiting worker.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub(crate) fn request_stop(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.stop {
                return false;
            }
            state.stop = true;
        }

        self.wake.notify_all();
        true
    }

    /// Block until there is a task to run or the worker should exit.
    ///
    /// The returned task has already been removed from the queue and the lock
    /// is released before this returns, so the caller runs it unlocked.
    /// `None` means the worker must stop.
    pub(crate) fn next_task(&self) -> Option<QueuedTask> {
        let mut state = self.state.lock();

        while state.queue.is_empty() && !state.stop {
            self.wake.wait(&mut state);
        }

        if state.stop {
            let exit = match self.policy {
                ShutdownPolicy::Immediate => true,
                ShutdownPolicy::Drain => state.queue.is_empty(),
            };
            if exit {
                return None;
            }
        }

        Some(state.queue.dequeue())
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.state.lock().stop
    }

    pub(crate) fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub(crate) fn total_enqueued(&self) -> u64 {
        self.state.lock().queue.total_enqueued()
    }

    pub(crate) fn worker_started(&self) {
        self.live_workers.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn worker_exited(&self) {
        self.live_workers.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn live_workers(&self) -> usize {
        self.live_workers.load(Ordering::Acquire)
    }

    /// Drop whatever is still queued and report the ids that never ran.
    pub(crate) fn discard_pending(&self) -> Vec<TaskId> {
        let drained = self.state.lock().queue.drain();
        drained.iter().map(QueuedTask::id).collect()
    }
}
