//! The task capability consumed by the scheduler.

use async_trait::async_trait;

use super::AppResult;

/// A unit of asynchronous work.
///
/// The scheduler holds tasks by identity (`Arc<T>`) and only ever calls
/// [`Task::execute`]. Returning `Err` (or panicking) reports the task as
/// failed on the error stream; the scheduler keeps running either way.
///
/// There is no scheduler-side timeout: a task that never settles keeps its
/// execution slot. Tasks bound their own duration.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use async_trait::async_trait;
/// use qd_scheduler::core::{AppResult, Task};
///
/// struct SleepTask {
///     name: String,
///     duration: Duration,
/// }
///
/// #[async_trait]
/// impl Task for SleepTask {
///     async fn execute(&self) -> AppResult<()> {
///         tokio::time::sleep(self.duration).await;
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         &self.name
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Run the task to completion.
    async fn execute(&self) -> AppResult<()>;

    /// Label used in log output.
    fn name(&self) -> &str {
        "task"
    }
}
