use crate::error::TaskError;
use crate::executor::types::{RunSummary, TaskResult};

/// Output renderer plugin (controls how run events are presented).
pub trait OutputRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn supports_streaming(&self) -> bool {
        false
    }
    fn render(&self, event: &RenderEvent);
}

/// Lifecycle events of a run, in the order the engine produces them.
#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        run_id: String,
        total_tasks: usize,
        total_phases: usize,
    },
    Plan {
        run_id: String,
        phases: Vec<Vec<String>>,
    },
    PhaseStart {
        run_id: String,
        phase_index: usize,
        task_ids: Vec<String>,
    },
    TaskStart {
        run_id: String,
        task_id: String,
        phase_index: usize,
        attempt: u32,
    },
    TaskRetry {
        run_id: String,
        task_id: String,
        attempt: u32,
        delay_ms: u64,
        error: TaskError,
    },
    TaskComplete {
        run_id: String,
        result: TaskResult,
    },
    PhaseEnd {
        run_id: String,
        phase_index: usize,
    },
    RunEnd {
        run_id: String,
        summary: RunSummary,
    },
}

impl RenderEvent {
    pub fn run_id(&self) -> &str {
        match self {
            Self::RunStart { run_id, .. }
            | Self::Plan { run_id, .. }
            | Self::PhaseStart { run_id, .. }
            | Self::TaskStart { run_id, .. }
            | Self::TaskRetry { run_id, .. }
            | Self::TaskComplete { run_id, .. }
            | Self::PhaseEnd { run_id, .. }
            | Self::RunEnd { run_id, .. } => run_id,
        }
    }
}
