//! Error types for the task pool

/// Result type for task pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur in the task pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// Pool is already running
    #[error("Task pool '{pool_name}' is already running with {worker_count} workers")]
    AlreadyRunning {
        /// Name of the pool
        pool_name: String,
        /// Number of worker threads
        worker_count: usize,
    },

    /// Pool was never started
    #[error("Task pool '{pool_name}' is not running")]
    NotRunning {
        /// Name of the pool
        pool_name: String,
    },

    /// Pool has been asked to stop and no longer accepts tasks
    #[error("Task pool '{pool_name}' is shutting down ({pending_tasks} tasks pending)")]
    ShuttingDown {
        /// Name of the pool
        pool_name: String,
        /// Number of tasks still queued when the submission was rejected
        pending_tasks: usize,
    },

    /// `join` was called before `shutdown`
    #[error("Task pool '{pool_name}' cannot be joined before shutdown")]
    NotShutDown {
        /// Name of the pool
        pool_name: String,
    },

    /// Failed to spawn a worker thread
    #[error("Failed to spawn worker thread #{worker_id}: {message}")]
    Spawn {
        /// ID of the worker that failed to spawn
        worker_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("Failed to join worker thread #{worker_id}: {message}")]
    Join {
        /// ID of the worker that failed to join
        worker_id: usize,
        /// Error message
        message: String,
    },

    /// A task reported failure from `run`
    #[error("Task '{task}' failed: {message}")]
    TaskFailed {
        /// Name of the failed task
        task: String,
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl PoolError {
    /// Create an already running error
    pub fn already_running(pool_name: impl Into<String>, worker_count: usize) -> Self {
        PoolError::AlreadyRunning {
            pool_name: pool_name.into(),
            worker_count,
        }
    }

    /// Create a not running error
    pub fn not_running(pool_name: impl Into<String>) -> Self {
        PoolError::NotRunning {
            pool_name: pool_name.into(),
        }
    }

    /// Create a shutting down error
    pub fn shutting_down(pool_name: impl Into<String>, pending_tasks: usize) -> Self {
        PoolError::ShuttingDown {
            pool_name: pool_name.into(),
            pending_tasks,
        }
    }

    /// Create a not shut down error
    pub fn not_shut_down(pool_name: impl Into<String>) -> Self {
        PoolError::NotShutDown {
            pool_name: pool_name.into(),
        }
    }

    /// Create a spawn error with the underlying io error
    pub fn spawn(worker_id: usize, source: std::io::Error) -> Self {
        PoolError::Spawn {
            worker_id,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(worker_id: usize, message: impl Into<String>) -> Self {
        PoolError::Join {
            worker_id,
            message: message.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failed(task: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::TaskFailed {
            task: task.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PoolError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PoolError::already_running("main_pool", 8);
        assert!(matches!(err, PoolError::AlreadyRunning { .. }));

        let err = PoolError::shutting_down("main_pool", 3);
        assert!(matches!(
            err,
            PoolError::ShuttingDown {
                pending_tasks: 3,
                ..
            }
        ));

        let err = PoolError::task_failed("parse", "bad input");
        assert!(matches!(
            err,
            PoolError::TaskFailed { ref task, ref message }
                if task == "parse" && message == "bad input"
        ));
    }

    #[test]
    fn test_error_display() {
        let err = PoolError::already_running("worker", 4);
        assert_eq!(
            err.to_string(),
            "Task pool 'worker' is already running with 4 workers"
        );

        let err = PoolError::not_shut_down("worker");
        assert_eq!(
            err.to_string(),
            "Task pool 'worker' cannot be joined before shutdown"
        );

        let err = PoolError::task_failed("resize", "out of range");
        assert_eq!(err.to_string(), "Task 'resize' failed: out of range");
    }

    #[test]
    fn test_spawn_error_keeps_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left");
        let err = PoolError::spawn(5, io_err);

        assert!(err.to_string().contains("worker thread #5"));
        assert!(err.to_string().contains("no threads left"));
        assert!(err.source().is_some());
    }
}
