//! # Rust Task Pool
//!
//! A fixed-size worker thread pool with a shared FIFO task queue.
//!
//! ## Features
//!
//! - **Fixed pool**: a configured number of named worker threads, spawned once
//! - **FIFO queue**: tasks are handed out in submission order, each to exactly one worker
//! - **Single lock**: the queue and the stop flag share one `parking_lot` mutex;
//!   idle workers sleep on a condition variable tied to it
//! - **Prompt shutdown**: `shutdown` wakes every idle worker and returns at once;
//!   `join` waits for the threads
//! - **Shutdown policy**: drain queued tasks before exiting (default) or exit immediately
//! - **Task isolation**: a task that fails or panics never takes its worker down
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_task_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(4)?;
//! pool.start()?;
//!
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("Task {} running", i);
//!         Ok(())
//!     })?;
//! }
//!
//! pool.shutdown_and_join()?;
//! assert_eq!(pool.total_tasks_completed(), 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Tasks
//!
//! ```rust
//! use rust_task_pool::prelude::*;
//!
//! struct Resize {
//!     width: u32,
//! }
//!
//! impl Task for Resize {
//!     fn run(&mut self) -> Result<()> {
//!         if self.width == 0 {
//!             return Err(PoolError::task_failed(self.name(), "zero width"));
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Resize"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(2)?;
//! pool.start()?;
//! pool.submit(Resize { width: 640 })?;
//! pool.submit(Resize { width: 0 })?;
//! pool.shutdown_and_join()?;
//!
//! assert_eq!(pool.total_tasks_completed(), 1);
//! assert_eq!(pool.total_tasks_failed(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Shutdown
//!
//! ```rust
//! use rust_task_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = ThreadPoolConfig::new(2)
//!     .with_thread_name_prefix("ingest")
//!     .with_shutdown_policy(ShutdownPolicy::Immediate);
//!
//! let pool = ThreadPool::with_config(config)?;
//! pool.start()?;
//! pool.shutdown()?;
//!
//! // Rejected: the pool is stopping
//! assert!(pool.execute(|| Ok(())).is_err());
//!
//! pool.join()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod tracing;

pub use crate::core::{BoxedTask, ClosureTask, PoolError, Result, Task};
pub use crate::pool::{PoolStats, ShutdownPolicy, ThreadPool, ThreadPoolConfig, WorkerStats};
pub use crate::queue::TaskId;
