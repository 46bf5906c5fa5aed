//! Configuration models for scheduler capacities.

pub mod scheduler;

pub use scheduler::{SchedulerConfig, ENV_MAX_PARALLEL_TASKS, ENV_MAX_QUEUED_TASKS};
