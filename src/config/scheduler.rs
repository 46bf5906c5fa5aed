//! Scheduler configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::{SchedulerLimits, DEFAULT_MAX_PARALLEL_TASKS, DEFAULT_MAX_QUEUED_TASKS};

/// Environment variable overriding `max_parallel_tasks`.
pub const ENV_MAX_PARALLEL_TASKS: &str = "QD_MAX_PARALLEL_TASKS";
/// Environment variable overriding `max_queued_tasks`.
pub const ENV_MAX_QUEUED_TASKS: &str = "QD_MAX_QUEUED_TASKS";

/// Startup configuration of a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum tasks executing at once.
    #[serde(default = "default_max_parallel_tasks")]
    pub max_parallel_tasks: usize,
    /// Maximum tasks waiting for a slot before admissions are rejected.
    #[serde(default = "default_max_queued_tasks")]
    pub max_queued_tasks: usize,
}

const fn default_max_parallel_tasks() -> usize {
    DEFAULT_MAX_PARALLEL_TASKS
}

const fn default_max_queued_tasks() -> usize {
    DEFAULT_MAX_QUEUED_TASKS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: DEFAULT_MAX_PARALLEL_TASKS,
            max_queued_tasks: DEFAULT_MAX_QUEUED_TASKS,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    ///
    /// Zero capacities are allowed at runtime (they close the scheduler) but a
    /// scheduler configured closed from the start is rejected.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_parallel_tasks == 0 {
            return Err("max_parallel_tasks must be greater than 0".into());
        }
        if self.max_queued_tasks == 0 {
            return Err("max_queued_tasks must be greater than 0".into());
        }
        Ok(())
    }

    /// Capacity limits described by this configuration.
    pub const fn limits(&self) -> SchedulerLimits {
        SchedulerLimits {
            max_parallel_tasks: self.max_parallel_tasks,
            max_queued_tasks: self.max_queued_tasks,
        }
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, loading a `.env`
    /// file first when present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_MAX_PARALLEL_TASKS) {
            cfg.max_parallel_tasks = parse_count(ENV_MAX_PARALLEL_TASKS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_QUEUED_TASKS) {
            cfg.max_queued_tasks = parse_count(ENV_MAX_QUEUED_TASKS, &raw)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_count(key: &str, raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("`{key}` must be a non-negative integer, got `{raw}`: {e}"))
}
