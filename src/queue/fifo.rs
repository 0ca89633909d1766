//! Passive FIFO task queue.

use crate::core::BoxedTask;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Sequence number assigned to a task when it is enqueued.
///
/// Ids grow strictly with enqueue order, so comparing two ids tells which
/// task was submitted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw sequence number
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// A task together with the id it was given on enqueue
pub struct QueuedTask {
    id: TaskId,
    task: BoxedTask,
}

impl QueuedTask {
    /// Id assigned at enqueue time
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Name of the wrapped task
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Borrow the task
    pub fn task_mut(&mut self) -> &mut BoxedTask {
        &mut self.task
    }

    /// Take ownership of the task
    pub fn into_task(self) -> BoxedTask {
        self.task
    }
}

impl fmt::Debug for QueuedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedTask")
            .field("id", &self.id)
            .field("task", &self.task.name())
            .finish()
    }
}

/// An ordered sequence of pending tasks.
///
/// The queue does no locking of its own. The pool keeps it inside the same
/// mutex as the stop flag, so every operation here runs under that lock.
///
/// # Example
///
/// ```rust
/// use rust_task_pool::core::ClosureTask;
/// use rust_task_pool::queue::TaskQueue;
///
/// let mut queue = TaskQueue::new();
/// let first = queue.enqueue(Box::new(ClosureTask::new(|| Ok(()))));
/// let second = queue.enqueue(Box::new(ClosureTask::new(|| Ok(()))));
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.dequeue().id(), first);
/// assert_eq!(queue.dequeue().id(), second);
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TaskQueue {
    entries: VecDeque<QueuedTask>,
    next_sequence: u64,
}

impl TaskQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail and return its id
    pub fn enqueue(&mut self, task: BoxedTask) -> TaskId {
        let id = TaskId(self.next_sequence);
        self.next_sequence += 1;
        self.entries.push_back(QueuedTask { id, task });
        id
    }

    /// Remove and return the head of the queue.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Callers check [`len`](Self::len) under
    /// the pool lock before dequeuing, so an empty dequeue is a broken
    /// invariant rather than a recoverable condition.
    pub fn dequeue(&mut self) -> QueuedTask {
        match self.entries.pop_front() {
            Some(entry) => entry,
            None => panic!("dequeue called on an empty task queue"),
        }
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no tasks are pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tasks ever enqueued
    pub fn total_enqueued(&self) -> u64 {
        self.next_sequence
    }

    /// Remove every pending task, oldest first
    pub fn drain(&mut self) -> Vec<QueuedTask> {
        self.entries.drain(..).collect()
    }
}
