use tracing::{debug, info, warn};

use super::traits::RenderEvent;
use super::types::TaskStatus;

/// Emit a run event through `tracing`.
///
/// Used by the engine whenever no renderer plugin is installed.
pub fn emit_event(event: &RenderEvent) {
    match event {
        RenderEvent::RunStart {
            run_id,
            total_tasks,
            total_phases,
        } => info!(%run_id, total_tasks, total_phases, "run started"),
        RenderEvent::Plan { run_id, phases } => {
            for (index, phase) in phases.iter().enumerate() {
                debug!(%run_id, phase = index, tasks = %phase.join(", "), "planned phase");
            }
        }
        RenderEvent::PhaseStart {
            run_id,
            phase_index,
            task_ids,
        } => info!(%run_id, phase = phase_index, tasks = task_ids.len(), "phase started"),
        RenderEvent::TaskStart {
            run_id,
            task_id,
            phase_index,
            attempt,
        } => debug!(%run_id, %task_id, phase = phase_index, attempt, "task started"),
        RenderEvent::TaskRetry {
            run_id,
            task_id,
            attempt,
            delay_ms,
            error,
        } => warn!(%run_id, %task_id, attempt, delay_ms, %error, "task attempt failed, retrying"),
        RenderEvent::TaskComplete { run_id, result } => match result.status {
            TaskStatus::Success => info!(
                %run_id,
                task_id = %result.task_id,
                attempts = result.attempts,
                duration_ms = result.duration_ms(),
                "task succeeded"
            ),
            TaskStatus::Failed => warn!(
                %run_id,
                task_id = %result.task_id,
                attempts = result.attempts,
                error = %display_error(result.error.as_ref()),
                "task failed"
            ),
            TaskStatus::Skipped => info!(
                %run_id,
                task_id = %result.task_id,
                reason = %display_error(result.error.as_ref()),
                "task skipped"
            ),
        },
        RenderEvent::PhaseEnd {
            run_id,
            phase_index,
        } => debug!(%run_id, phase = phase_index, "phase finished"),
        RenderEvent::RunEnd { run_id, summary } => info!(
            %run_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            wall_clock_ms = summary.wall_clock_ms,
            time_saved_ms = summary.time_saved_ms,
            "run finished"
        ),
    }
}

fn display_error(error: Option<&crate::error::TaskError>) -> String {
    error.map(ToString::to_string).unwrap_or_default()
}
