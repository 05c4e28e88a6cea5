use anyhow::Context;

use crate::error::SchedulerError;

use super::types::AppConfig;

const RETRY_STRATEGIES: &[&str] = &["fixed", "linear", "exponential-backoff"];
const OUTPUT_FORMATS: &[&str] = &["tracing", "text", "jsonl"];

impl AppConfig {
    /// Parse configuration from TOML text supplied by the caller.
    ///
    /// Missing sections and keys fall back to their defaults. The result is
    /// validated before it is returned.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(s).context("parse agentflow config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.scheduler.concurrency_limit == 0 {
            return Err(SchedulerError::InvalidConfig(
                "scheduler.concurrency_limit must be at least 1".to_string(),
            ));
        }
        if self.scheduler.task_timeout_ms == 0 {
            return Err(SchedulerError::InvalidConfig(
                "scheduler.task_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if !RETRY_STRATEGIES.contains(&self.retry.strategy.as_str()) {
            return Err(SchedulerError::InvalidConfig(format!(
                "unknown retry strategy '{}' (expected one of: {})",
                self.retry.strategy,
                RETRY_STRATEGIES.join(", ")
            )));
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(SchedulerError::InvalidConfig(
                "retry.max_delay_ms must not be smaller than retry.base_delay_ms".to_string(),
            ));
        }
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(SchedulerError::InvalidConfig(format!(
                "unknown output format '{}' (expected one of: {})",
                self.output.format,
                OUTPUT_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}
