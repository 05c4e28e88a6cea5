use crate::error::TaskError;

use super::types::result::saturating_millis;
use super::types::{RunSummary, TaskResult, TaskStatus};

/// Merge per-task results into a [`RunSummary`].
///
/// Pure and infallible; an empty input yields an all-zero summary. The
/// wall-clock span is `max(finished_at) - min(started_at)` and the
/// sequential estimate is the sum of individual durations. `time_saved`
/// saturates at zero, which happens when skips and failures dominate.
pub fn summarize(results: Vec<TaskResult>) -> RunSummary {
    let count = |status: TaskStatus| results.iter().filter(|r| r.status == status).count();
    let succeeded = count(TaskStatus::Success);
    let failed = count(TaskStatus::Failed);
    let skipped = count(TaskStatus::Skipped);

    let sequential_ms: u64 = results.iter().map(TaskResult::duration_ms).sum();

    let first_start = results.iter().map(|r| r.started_at).min();
    let last_finish = results.iter().map(|r| r.finished_at).max();
    let wall_clock_ms = match (first_start, last_finish) {
        (Some(start), Some(finish)) => (finish - start)
            .to_std()
            .map(saturating_millis)
            .unwrap_or(0),
        _ => 0,
    };

    let cancelled = results
        .iter()
        .any(|r| matches!(r.error, Some(TaskError::RunCancelled)));

    RunSummary {
        run_id: String::new(),
        total: results.len(),
        succeeded,
        failed,
        skipped,
        wall_clock_ms,
        sequential_ms,
        time_saved_ms: sequential_ms.saturating_sub(wall_clock_ms),
        cancelled,
        phases: Vec::new(),
        results,
    }
}
