//! Task trait and related types

use crate::core::error::Result;
use std::fmt;

/// A unit of work executed by exactly one worker thread.
///
/// The pool never inspects what `run` does. A returned error or a panic is
/// logged and counted against the worker that ran the task; it is never
/// propagated back to the submitter and never stops the worker.
pub trait Task: Send {
    /// Run the task to completion
    ///
    /// # Errors
    ///
    /// Returns an error if the task failed. The pool only records it.
    fn run(&mut self) -> Result<()>;

    /// Get the task's name for logging and statistics
    fn name(&self) -> &str {
        "Task"
    }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.name())
    }
}

/// A boxed task that can be moved across threads
pub type BoxedTask = Box<dyn Task>;

/// Adapts a closure into a [`Task`]
pub struct ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    /// Create a new closure task
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureTask".to_string(),
        }
    }

    /// Create a new closure task with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> Task for ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn run(&mut self) -> Result<()> {
        match self.closure.take() {
            Some(closure) => closure(),
            None => Err(crate::core::PoolError::task_failed(
                self.name.as_str(),
                "closure already ran",
            )),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolError;

    #[test]
    fn test_closure_task() {
        let mut task = ClosureTask::new(|| Ok(()));

        assert_eq!(task.name(), "ClosureTask");
        assert!(task.run().is_ok());
    }

    #[test]
    fn test_closure_task_with_name() {
        let task = ClosureTask::with_name(|| Ok(()), "reduce");
        assert_eq!(task.name(), "reduce");
    }

    #[test]
    fn test_closure_task_runs_once() {
        let mut task = ClosureTask::with_name(|| Ok(()), "once");
        task.run().expect("first run succeeds");

        let err = task.run().expect_err("second run must fail");
        assert!(matches!(err, PoolError::TaskFailed { ref task, .. } if task == "once"));
    }

    #[test]
    fn test_boxed_task_debug() {
        let task: BoxedTask = Box::new(ClosureTask::with_name(|| Ok(()), "fetch"));
        assert_eq!(format!("{:?}", task), "Task(fetch)");
    }
}
