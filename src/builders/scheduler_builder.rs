//! Builders to construct a scheduler from configuration.

use crate::config::SchedulerConfig;
use crate::core::{Scheduler, SchedulerError, Spawn, Task};

/// Validate `cfg` and build an idle scheduler from it.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfig`] when validation fails.
pub fn build_scheduler<T, S>(
    cfg: &SchedulerConfig,
    spawner: S,
) -> Result<Scheduler<T, S>, SchedulerError>
where
    T: Task,
    S: Spawn + Clone + Send + 'static,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;
    tracing::debug!(
        max_parallel_tasks = cfg.max_parallel_tasks,
        max_queued_tasks = cfg.max_queued_tasks,
        "building scheduler"
    );
    Ok(Scheduler::new(cfg.limits(), spawner))
}
