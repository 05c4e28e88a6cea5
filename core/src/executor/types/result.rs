use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaskError;

/// Terminal state of a task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Success,
    Failed,
    Skipped,
}

/// Outcome of a single task. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Executor invocations made; 0 for skipped tasks.
    pub attempts: u32,

    pub error: Option<TaskError>,

    /// Value returned by the executor on success.
    pub output: Option<Value>,
}

impl TaskResult {
    pub fn success(
        task_id: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        attempts: u32,
        output: Value,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Success,
            started_at,
            finished_at,
            attempts,
            error: None,
            output: Some(output),
        }
    }

    pub fn failed(
        task_id: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        attempts: u32,
        error: TaskError,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Failed,
            started_at,
            finished_at,
            attempts,
            error: Some(error),
            output: None,
        }
    }

    /// A task that never reached the executor.
    pub fn skipped(task_id: impl Into<String>, error: TaskError) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Skipped,
            started_at: now,
            finished_at: now,
            attempts: 0,
            error: Some(error),
            output: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }

    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    pub fn duration_ms(&self) -> u64 {
        saturating_millis(self.duration())
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Aggregated report for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,

    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,

    /// `max(finished_at) - min(started_at)` over all results.
    pub wall_clock_ms: u64,

    /// Sum of the individual task durations.
    pub sequential_ms: u64,

    /// `sequential_ms - wall_clock_ms`, floored at zero.
    pub time_saved_ms: u64,

    /// At least one task was skipped because the run was cancelled.
    pub cancelled: bool,

    /// Planned phases, in execution order.
    pub phases: Vec<Vec<String>>,

    /// Per-task results in the order they were recorded.
    pub results: Vec<TaskResult>,
}

impl RunSummary {
    /// Attach run identity and the executed plan.
    pub fn for_run(mut self, run_id: impl Into<String>, phases: Vec<Vec<String>>) -> Self {
        self.run_id = run_id.into();
        self.phases = phases;
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn result(&self, task_id: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.task_id == task_id)
    }

    pub fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        self.result(task_id).map(|r| r.status)
    }

    pub fn wall_clock(&self) -> Duration {
        Duration::from_millis(self.wall_clock_ms)
    }

    pub fn time_saved(&self) -> Duration {
        Duration::from_millis(self.time_saved_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_millis() {
        assert_eq!(saturating_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_skipped_result_has_no_duration() {
        let result = TaskResult::skipped("b", TaskError::DependencySkipped("a".into()));
        assert_eq!(result.duration_ms(), 0);
        assert_eq!(result.attempts, 0);
    }
}
