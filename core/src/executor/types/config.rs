use std::time::Duration;

use crate::config::AppConfig;
use crate::error::SchedulerError;

/// Runtime knobs for one [`crate::executor::ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum number of tasks in flight at any instant.
    pub concurrency_limit: usize,

    /// Bound on a single attempt of a single task.
    pub task_timeout: Duration,

    /// Draw progress bars on stderr.
    pub progress_bar: bool,

    /// Run identifier; a UUID is generated when unset.
    pub run_id: Option<String>,
}

impl ExecutionOptions {
    pub fn new(concurrency_limit: usize, task_timeout: Duration) -> Self {
        Self {
            concurrency_limit,
            task_timeout,
            progress_bar: false,
            run_id: None,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            concurrency_limit: cfg.scheduler.concurrency_limit,
            task_timeout: Duration::from_millis(cfg.scheduler.task_timeout_ms),
            progress_bar: cfg.scheduler.progress_bar,
            run_id: None,
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.progress_bar = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.concurrency_limit == 0 {
            return Err(SchedulerError::InvalidConfig(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        if self.task_timeout.is_zero() {
            return Err(SchedulerError::InvalidConfig(
                "task timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
