//! Tests for error types

use qd_scheduler::core::SchedulerError;

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull { capacity: 200 };
    assert_eq!(format!("{}", err), "queue full: capacity 200 reached");
}

#[test]
fn test_already_started_error() {
    let err = SchedulerError::AlreadyStarted;
    assert_eq!(format!("{}", err), "scheduler already started");
}

#[test]
fn test_shutdown_error() {
    let err = SchedulerError::Shutdown;
    assert_eq!(format!("{}", err), "scheduler shut down");
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_parallel_tasks must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_parallel_tasks must be greater than 0"
    );
}
