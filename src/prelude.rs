//! Convenient re-exports for common types and traits

pub use crate::core::{BoxedTask, ClosureTask, PoolError, Result, Task};
pub use crate::pool::{PoolStats, ShutdownPolicy, ThreadPool, ThreadPoolConfig, WorkerStats};
pub use crate::queue::TaskId;
pub use crate::tracing::TracedTask;
