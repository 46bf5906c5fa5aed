//! Core scheduling abstractions: the bounded queue, event topics and the scheduler.

pub mod bounded_queue;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod task;

pub use bounded_queue::BoundedQueue;
pub use error::{AppResult, SchedulerError};
pub use events::{EventStream, EventTopic, TaskEvent, TaskFailure, ValueTopic};
pub use scheduler::{
    Scheduler, SchedulerLimits, SchedulerStats, Spawn, DEFAULT_MAX_PARALLEL_TASKS,
    DEFAULT_MAX_QUEUED_TASKS,
};
pub use task::Task;
