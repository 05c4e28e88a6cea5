#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agentflow_core::api::{
    ExecutionEngine, ExecutionOptions, FixedBackoff, OutputRendererPlugin, RenderEvent,
    TaskContext, TaskDescriptor, TaskExecutor,
};
use async_trait::async_trait;
use serde_json::{json, Value};

pub fn task(id: &str, deps: &[&str]) -> TaskDescriptor {
    TaskDescriptor::new(id).depends_on(deps.iter().copied())
}

/// Engine with a generous timeout and no delay between retries.
pub fn engine(concurrency_limit: usize) -> ExecutionEngine {
    ExecutionEngine::builder(ExecutionOptions::new(
        concurrency_limit,
        Duration::from_secs(5),
    ))
    .retry_strategy(Arc::new(FixedBackoff::new(Duration::ZERO)))
    .build()
}

/// Sleeps for a fixed time per task and records dispatch order and the
/// highest number of tasks observed in flight.
#[derive(Default)]
pub struct RecordingExecutor {
    delay: Duration,
    failing: HashSet<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    starts: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing(mut self, ids: &[&str]) -> Self {
        self.failing.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> Vec<String> {
        self.starts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskExecutor for RecordingExecutor {
    async fn execute(&self, task: &TaskDescriptor, ctx: &TaskContext) -> anyhow::Result<Value> {
        self.starts.lock().unwrap().push(task.id.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&task.id) {
            anyhow::bail!("{} exploded", task.id);
        }
        Ok(json!({ "task": task.id, "attempt": ctx.attempt }))
    }
}

/// Renderer that keeps a short label for every event it sees.
#[derive(Default)]
pub struct CapturingRenderer {
    events: Mutex<Vec<String>>,
}

impl CapturingRenderer {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl OutputRendererPlugin for CapturingRenderer {
    fn name(&self) -> &str {
        "capture"
    }

    fn format(&self) -> &str {
        "memory"
    }

    fn render(&self, event: &RenderEvent) {
        let label = match event {
            RenderEvent::RunStart { .. } => "run_start".to_string(),
            RenderEvent::Plan { .. } => "plan".to_string(),
            RenderEvent::PhaseStart { phase_index, .. } => format!("phase_start:{phase_index}"),
            RenderEvent::TaskStart {
                task_id, attempt, ..
            } => format!("task_start:{task_id}:{attempt}"),
            RenderEvent::TaskRetry {
                task_id, attempt, ..
            } => format!("task_retry:{task_id}:{attempt}"),
            RenderEvent::TaskComplete { result, .. } => {
                format!("task_complete:{}", result.task_id)
            }
            RenderEvent::PhaseEnd { phase_index, .. } => format!("phase_end:{phase_index}"),
            RenderEvent::RunEnd { .. } => "run_end".to_string(),
        };
        self.events.lock().unwrap().push(label);
    }
}
