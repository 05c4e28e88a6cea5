use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::executor::types::TaskDescriptor;

/// Performs the actual work behind a task.
///
/// The engine treats implementations as black boxes: an `Ok` value becomes
/// the task output, an `Err` fails the attempt.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, task: &TaskDescriptor, ctx: &TaskContext) -> anyhow::Result<Value>;
}

/// Per-attempt view handed to an executor.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub run_id: String,
    pub phase_index: usize,

    /// 1-based attempt number.
    pub attempt: u32,

    /// Cancelled when the attempt times out or the run is cancelled.
    /// Executors are expected to observe it and stop early.
    pub cancel: CancellationToken,

    /// Outputs of the task's direct dependencies.
    pub dependency_outputs: HashMap<String, Value>,
}

impl TaskContext {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn dependency_output(&self, task_id: &str) -> Option<&Value> {
        self.dependency_outputs.get(task_id)
    }
}

/// Adapter turning an async closure into a [`TaskExecutor`].
pub struct FnExecutor<F> {
    f: F,
}

pub fn executor_fn<F, Fut>(f: F) -> FnExecutor<F>
where
    F: Fn(TaskDescriptor, TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    FnExecutor { f }
}

#[async_trait]
impl<F, Fut> TaskExecutor for FnExecutor<F>
where
    F: Fn(TaskDescriptor, TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn execute(&self, task: &TaskDescriptor, ctx: &TaskContext) -> anyhow::Result<Value> {
        (self.f)(task.clone(), ctx.clone()).await
    }
}
