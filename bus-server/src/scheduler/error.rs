//! Scheduler error types.

/// Error from a scheduler operation.
///
/// These are state conflicts, reported synchronously to the caller;
/// nothing here is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// No task registered under this id
    #[error("no task named {0}")]
    NotFound(String),

    /// Trigger refused because an execution is in flight
    #[error("task {0} is already running")]
    AlreadyRunning(String),

    /// Stop refused because no execution is in flight
    #[error("task {0} is not running")]
    NotRunning(String),

    /// Enable refused because the periodic driver already exists
    #[error("task {0} is already enabled")]
    AlreadyEnabled(String),

    /// Disable refused because there is no periodic driver
    #[error("task {0} is already disabled")]
    AlreadyDisabled(String),
}

impl SchedulerError {
    /// The id of the task the operation referred to.
    pub fn task_id(&self) -> &str {
        match self {
            SchedulerError::NotFound(id)
            | SchedulerError::AlreadyRunning(id)
            | SchedulerError::NotRunning(id)
            | SchedulerError::AlreadyEnabled(id)
            | SchedulerError::AlreadyDisabled(id) => id,
        }
    }
}
