use agentflow_core::executor::traits::{OutputRendererPlugin, RenderEvent};
use agentflow_core::executor::types::TaskStatus;

pub struct TextRendererPlugin {
    ascii_only: bool,
}

impl TextRendererPlugin {
    pub fn new(ascii_only: bool) -> Self {
        Self { ascii_only }
    }

    fn status_label(&self, status: TaskStatus) -> &'static str {
        match (status, self.ascii_only) {
            (TaskStatus::Success, true) => "OK",
            (TaskStatus::Success, false) => "✓ SUCCESS",
            (TaskStatus::Failed, true) => "FAIL",
            (TaskStatus::Failed, false) => "✗ FAILED",
            (TaskStatus::Skipped, true) => "SKIP",
            (TaskStatus::Skipped, false) => "⊘ SKIPPED",
        }
    }

    fn format_event(&self, event: &RenderEvent) -> String {
        match event {
            RenderEvent::RunStart {
                run_id,
                total_tasks,
                total_phases,
            } => format!(
                "RUN START {} (tasks: {}, phases: {})",
                run_id, total_tasks, total_phases
            ),
            RenderEvent::Plan { run_id, phases } => {
                let mut out = format!("PLAN {}:", run_id);
                for (idx, phase) in phases.iter().enumerate() {
                    out.push_str(&format!("\n  phase {}: {}", idx, phase.join(", ")));
                }
                out
            }
            RenderEvent::PhaseStart {
                run_id,
                phase_index,
                task_ids,
            } => format!(
                "PHASE START {} (phase {}, tasks: {})",
                run_id,
                phase_index,
                task_ids.len()
            ),
            RenderEvent::TaskStart {
                run_id,
                task_id,
                phase_index,
                attempt,
            } => format!(
                "TASK START {} (phase {}, task {}, attempt {})",
                run_id, phase_index, task_id, attempt
            ),
            RenderEvent::TaskRetry {
                run_id,
                task_id,
                attempt,
                delay_ms,
                error,
            } => format!(
                "TASK RETRY {} (task {}, attempt {} failed: {}; next in {}ms)",
                run_id, task_id, attempt, error, delay_ms
            ),
            RenderEvent::TaskComplete { run_id, result } => {
                let mut line = format!(
                    "TASK END {} (task {}, status {}, attempts {}, duration {}ms)",
                    run_id,
                    result.task_id,
                    self.status_label(result.status),
                    result.attempts,
                    result.duration_ms()
                );
                if let Some(err) = &result.error {
                    line.push_str(&format!(": {}", err));
                }
                line
            }
            RenderEvent::PhaseEnd {
                run_id,
                phase_index,
            } => {
                format!("PHASE END {} (phase {})", run_id, phase_index)
            }
            RenderEvent::RunEnd { run_id, summary } => format!(
                "RUN END {} (succeeded {}, failed {}, skipped {}, wall {}ms, sequential {}ms, saved {}ms)",
                run_id,
                summary.succeeded,
                summary.failed,
                summary.skipped,
                summary.wall_clock_ms,
                summary.sequential_ms,
                summary.time_saved_ms
            ),
        }
    }
}

impl OutputRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        println!("{}", self.format_event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_core::error::TaskError;
    use agentflow_core::executor::types::{RunSummary, TaskResult};

    #[test]
    fn test_text_renderer_skipped_task() {
        let renderer = TextRendererPlugin::new(true);
        let event = RenderEvent::TaskComplete {
            run_id: "run".to_string(),
            result: TaskResult::skipped("deploy", TaskError::DependencySkipped("build".into())),
        };

        let line = renderer.format_event(&event);
        assert!(line.contains("TASK END"));
        assert!(line.contains("status SKIP"));
        assert!(line.contains("attempts 0"));
        assert!(line.ends_with("dependency failed: build"));
    }

    #[test]
    fn test_text_renderer_plan_lists_phases() {
        let renderer = TextRendererPlugin::new(false);
        let event = RenderEvent::Plan {
            run_id: "run".to_string(),
            phases: vec![vec!["a".into()], vec!["b".into(), "c".into()]],
        };

        let text = renderer.format_event(&event);
        assert_eq!(text, "PLAN run:\n  phase 0: a\n  phase 1: b, c");
    }

    #[test]
    fn test_text_renderer_run_end() {
        let renderer = TextRendererPlugin::new(false);
        let summary = RunSummary {
            total: 2,
            succeeded: 2,
            wall_clock_ms: 100,
            sequential_ms: 180,
            time_saved_ms: 80,
            ..RunSummary::default()
        };
        let line = renderer.format_event(&RenderEvent::RunEnd {
            run_id: "run".to_string(),
            summary,
        });
        assert!(line.contains("succeeded 2"));
        assert!(line.contains("saved 80ms"));
    }
}
