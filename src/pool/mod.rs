//! Thread pool and worker implementations

mod shared;
pub mod thread_pool;
pub mod worker;

pub use thread_pool::{PoolStats, ShutdownPolicy, ThreadPool, ThreadPoolConfig};
pub use worker::{WorkerStatSnapshot, WorkerStats};
