//! # QD Scheduler
//!
//! A bounded-concurrency task scheduler for asynchronous work.
//!
//! Clients submit tasks; the scheduler admits them into a capacity-limited
//! *pending* queue, then promotes them in arrival order into a
//! capacity-limited *running* queue as execution slots free up. Demand beyond
//! the pending capacity is rejected synchronously.
//!
//! ## Key Features
//!
//! - **Admission control**: `queue_task` fails with `QueueFull` instead of blocking
//! - **Bounded concurrency**: at most `max_parallel_tasks` executions in flight
//! - **FIFO promotion**: strict arrival order, no priorities
//! - **Runtime reconfiguration**: both capacities can change while running
//! - **Lifecycle streams**: queued, starting, error and completed events, plus
//!   live queued/running counts that replay their current value
//! - **Error isolation**: a failing or panicking task is reported and released,
//!   never fatal to the scheduler
//!
//! ## Example
//!
//! ```rust,ignore
//! use qd_scheduler::core::{Scheduler, SchedulerLimits};
//! use qd_scheduler::runtime::TokioSpawner;
//!
//! let scheduler = Scheduler::new(
//!     SchedulerLimits { max_parallel_tasks: 4, max_queued_tasks: 100 },
//!     TokioSpawner::current()?,
//! );
//!
//! let mut completed = scheduler.task_completed();
//! scheduler.start()?;
//!
//! for job in jobs {
//!     if let Err(e) = scheduler.queue_task(job) {
//!         tracing::warn!("dropping job: {e}");
//!     }
//! }
//!
//! while let Some(task) = completed.recv().await {
//!     tracing::info!("{} done", task.name());
//! }
//! ```
//!
//! For a complete harness, see `demos/sleep_tasks.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: bounded queue, events, scheduler.
pub mod core;
/// Configuration models for scheduler capacities.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
