use agentflow_core::executor::traits::{OutputRendererPlugin, RenderEvent};
use chrono::Local;
use serde_json::{json, Value};

pub struct JsonlRendererPlugin {
    pretty_print: bool,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            RenderEvent::RunStart {
                run_id,
                total_tasks,
                total_phases,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "total_tasks": total_tasks,
                    "total_phases": total_phases,
                }
            }),
            RenderEvent::Plan { run_id, phases } => {
                let total_tasks: usize = phases.iter().map(|p| p.len()).sum();
                json!({
                    "v": 1,
                    "event_type": "executor.plan",
                    "ts": ts,
                    "run_id": run_id,
                    "metadata": {
                        "phases": phases,
                        "total_tasks": total_tasks,
                    }
                })
            }
            RenderEvent::PhaseStart {
                run_id,
                phase_index,
                task_ids,
            } => json!({
                "v": 1,
                "event_type": "phase.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "phase_index": phase_index,
                    "tasks": task_ids,
                }
            }),
            RenderEvent::TaskStart {
                run_id,
                task_id,
                phase_index,
                attempt,
            } => json!({
                "v": 1,
                "event_type": "task.start",
                "ts": ts,
                "run_id": run_id,
                "task_id": task_id,
                "metadata": {
                    "phase_index": phase_index,
                    "attempt": attempt,
                }
            }),
            RenderEvent::TaskRetry {
                run_id,
                task_id,
                attempt,
                delay_ms,
                error,
            } => json!({
                "v": 1,
                "event_type": "task.retry",
                "ts": ts,
                "run_id": run_id,
                "task_id": task_id,
                "metadata": {
                    "attempt": attempt,
                    "delay_ms": delay_ms,
                    "error": error,
                }
            }),
            RenderEvent::TaskComplete { run_id, result } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "run_id": run_id,
                "task_id": result.task_id,
                "status": result.status,
                "metadata": {
                    "duration_ms": result.duration_ms(),
                    "attempts": result.attempts,
                    "error": result.error,
                    "output": result.output,
                }
            }),
            RenderEvent::PhaseEnd {
                run_id,
                phase_index,
            } => json!({
                "v": 1,
                "event_type": "phase.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "phase_index": phase_index,
                }
            }),
            RenderEvent::RunEnd { run_id, summary } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "total_tasks": summary.total,
                    "succeeded": summary.succeeded,
                    "failed": summary.failed,
                    "skipped": summary.skipped,
                    "cancelled": summary.cancelled,
                    "wall_clock_ms": summary.wall_clock_ms,
                    "sequential_ms": summary.sequential_ms,
                    "time_saved_ms": summary.time_saved_ms,
                }
            }),
        }
    }
}

impl OutputRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
        } else {
            println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
        }
    }
}
