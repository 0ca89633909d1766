//! Task queue used by the pool.
//!
//! [`TaskQueue`] is a plain FIFO with no synchronization. The pool owns the
//! only instance and touches it exclusively while holding its state lock.

mod fifo;

pub use fifo::{QueuedTask, TaskId, TaskQueue};
