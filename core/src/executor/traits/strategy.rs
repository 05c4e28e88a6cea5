use std::time::Duration;

use crate::error::TaskError;

/// Decides whether and when a failed attempt is retried.
///
/// The per-task retry budget (`max_retries`) is enforced by the engine;
/// strategies only shape the delay and may veto retries for fatal errors.
pub trait RetryStrategyPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Delay before the attempt following `attempt` (1-based). `None` stops retrying.
    fn next_delay(&self, attempt: u32, error: &TaskError) -> Option<Duration>;

    fn should_retry(&self, _attempt: u32, error: &TaskError) -> bool {
        !self.is_fatal_error(error)
    }

    fn is_fatal_error(&self, _error: &TaskError) -> bool {
        false
    }
}

/// Constant delay between attempts. Defaults to one second.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl RetryStrategyPlugin for FixedBackoff {
    fn name(&self) -> &str {
        "fixed"
    }

    fn next_delay(&self, _attempt: u32, _error: &TaskError) -> Option<Duration> {
        Some(self.delay)
    }
}
