use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-task runtime error recorded on a [`crate::executor::TaskResult`].
///
/// Never escapes the engine; a run always completes with a summary.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TaskError {
    #[error("task failed: {0}")]
    Failed(String),

    #[error("timeout exceeded after {timeout_ms}ms")]
    TimeoutExceeded { timeout_ms: u64 },

    #[error("dependency failed: {0}")]
    DependencySkipped(String),

    #[error("run cancelled")]
    RunCancelled,
}

impl TaskError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutExceeded { .. })
    }

    /// Errors that mark a task as skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::DependencySkipped(_) | Self::RunCancelled)
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed(format!("{err:#}"))
    }
}
