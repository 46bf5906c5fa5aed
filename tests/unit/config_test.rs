//! Tests for configuration validation

use qd_scheduler::config::SchedulerConfig;

#[test]
fn test_default_config() {
    let config = SchedulerConfig::default();
    assert_eq!(config.max_parallel_tasks, 10);
    assert_eq!(config.max_queued_tasks, 200);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_invalid_parallel_tasks() {
    let invalid = SchedulerConfig {
        max_parallel_tasks: 0,
        max_queued_tasks: 50,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_queued_tasks() {
    let invalid = SchedulerConfig {
        max_parallel_tasks: 4,
        max_queued_tasks: 0,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "max_parallel_tasks": 4,
        "max_queued_tasks": 50
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_parallel_tasks, 4);
    assert_eq!(config.max_queued_tasks, 50);
}

#[test]
fn test_config_from_json_uses_defaults() {
    let config = SchedulerConfig::from_json_str("{}").unwrap();
    assert_eq!(config, SchedulerConfig::default());
}

#[test]
fn test_config_from_json_rejects_negative() {
    let result = SchedulerConfig::from_json_str(r#"{ "max_parallel_tasks": -1 }"#);
    assert!(result.unwrap_err().starts_with("parse error"));
}

#[test]
fn test_config_limits() {
    let config = SchedulerConfig {
        max_parallel_tasks: 3,
        max_queued_tasks: 7,
    };
    let limits = config.limits();
    assert_eq!(limits.max_parallel_tasks, 3);
    assert_eq!(limits.max_queued_tasks, 7);
}
