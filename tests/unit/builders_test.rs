//! Tests for builder modules

use async_trait::async_trait;
use qd_scheduler::builders::build_scheduler;
use qd_scheduler::config::SchedulerConfig;
use qd_scheduler::core::{AppResult, SchedulerError, Task};
use qd_scheduler::runtime::TokioSpawner;

struct Noop;

#[async_trait]
impl Task for Noop {
    async fn execute(&self) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_build_scheduler_applies_limits() {
    let config = SchedulerConfig {
        max_parallel_tasks: 2,
        max_queued_tasks: 5,
    };
    let scheduler = build_scheduler::<Noop, _>(&config, TokioSpawner::current().unwrap()).unwrap();

    let limits = scheduler.limits();
    assert_eq!(limits.max_parallel_tasks, 2);
    assert_eq!(limits.max_queued_tasks, 5);
}

#[tokio::test]
async fn test_build_scheduler_rejects_invalid_config() {
    let config = SchedulerConfig {
        max_parallel_tasks: 0,
        max_queued_tasks: 5,
    };
    let result = build_scheduler::<Noop, _>(&config, TokioSpawner::current().unwrap());
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}
