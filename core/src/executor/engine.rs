use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{SchedulerError, TaskError};

use super::graph::TaskGraph;
use super::ledger::RunLedger;
use super::output::emit_event;
use super::planner::{plan, Phase};
use super::progress::ProgressMonitor;
use super::scheduler::execute_phase_parallel;
use super::summary::summarize;
use super::traits::{
    FixedBackoff, OutputRendererPlugin, RenderEvent, RetryStrategyPlugin, TaskContext,
    TaskExecutor,
};
use super::types::result::saturating_millis;
use super::types::{ExecutionOptions, RunSummary, TaskDescriptor, TaskResult, TaskStatus};

/// Execution engine for task dependency graphs
///
/// Runs phases strictly in order and the tasks of a phase concurrently, up to
/// the configured limit. Task failures never abort the run: downstream tasks
/// are skipped and the engine moves on to the next phase.
pub struct ExecutionEngine {
    opts: ExecutionOptions,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
    retry_strategy: Arc<dyn RetryStrategyPlugin>,
    cancel: CancellationToken,
}

pub struct ExecutionEngineBuilder {
    opts: ExecutionOptions,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
    retry_strategy: Arc<dyn RetryStrategyPlugin>,
    cancel: CancellationToken,
}

/// Shared, read-only view of one run handed to every task worker.
struct RunState<'a> {
    run_id: &'a str,
    graph: &'a TaskGraph,
    executor: &'a dyn TaskExecutor,
    ledger: &'a RunLedger,
    progress: &'a Mutex<ProgressMonitor>,
}

impl ExecutionEngine {
    pub fn new(opts: ExecutionOptions) -> Self {
        Self::builder(opts).build()
    }

    pub fn builder(opts: ExecutionOptions) -> ExecutionEngineBuilder {
        ExecutionEngineBuilder::new(opts)
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.opts
    }

    /// Token that cancels runs of this engine when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Build, plan and execute in one call.
    ///
    /// Structural problems (duplicate ids, unknown dependencies, cycles,
    /// invalid options) are returned before any task runs. Everything that
    /// goes wrong afterwards is captured in the returned summary.
    pub async fn plan_and_execute(
        &self,
        descriptors: Vec<TaskDescriptor>,
        executor: &dyn TaskExecutor,
    ) -> Result<RunSummary, SchedulerError> {
        self.opts.validate()?;
        let graph = TaskGraph::build(descriptors)?;
        let phases = plan(&graph);
        Ok(self.execute(&phases, &graph, executor).await)
    }

    /// Execute planned phases sequentially (tasks within a phase run in parallel)
    pub async fn execute(
        &self,
        phases: &[Phase],
        graph: &TaskGraph,
        executor: &dyn TaskExecutor,
    ) -> RunSummary {
        let run_id = self
            .opts
            .run_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let plan_ids: Vec<Vec<String>> = phases.iter().map(|p| p.task_ids.clone()).collect();

        let ledger = RunLedger::new();
        let progress = Mutex::new(ProgressMonitor::new(graph.len(), self.opts.progress_bar));
        let state = RunState {
            run_id: &run_id,
            graph,
            executor,
            ledger: &ledger,
            progress: &progress,
        };

        self.emit(RenderEvent::RunStart {
            run_id: run_id.clone(),
            total_tasks: graph.len(),
            total_phases: phases.len(),
        });
        self.emit(RenderEvent::Plan {
            run_id: run_id.clone(),
            phases: plan_ids.clone(),
        });

        for phase in phases {
            self.emit(RenderEvent::PhaseStart {
                run_id: run_id.clone(),
                phase_index: phase.index,
                task_ids: phase.task_ids.clone(),
            });
            if let Ok(monitor) = progress.lock() {
                monitor.update_phase(phase.index, phases.len());
            }

            let mut runnable = Vec::with_capacity(phase.len());
            for task_id in &phase.task_ids {
                if self.cancel.is_cancelled() {
                    self.finish_task(&state, TaskResult::skipped(task_id, TaskError::RunCancelled));
                    continue;
                }
                match first_unsatisfied_dependency(graph, &ledger, task_id) {
                    Some(dep) => self.finish_task(
                        &state,
                        TaskResult::skipped(task_id, TaskError::DependencySkipped(dep)),
                    ),
                    None => runnable.push(task_id.clone()),
                }
            }

            if !runnable.is_empty() {
                execute_phase_parallel(&runnable, self.opts.concurrency_limit, |task_id| {
                    self.run_task(&state, phase.index, task_id)
                })
                .await;
            }

            self.emit(RenderEvent::PhaseEnd {
                run_id: run_id.clone(),
                phase_index: phase.index,
            });
        }

        let summary = summarize(ledger.snapshot()).for_run(run_id.clone(), plan_ids);

        if let Ok(monitor) = progress.lock() {
            monitor.finish(summary.is_success());
        }
        self.emit(RenderEvent::RunEnd {
            run_id,
            summary: summary.clone(),
        });

        summary
    }

    /// Run one task to a terminal result, retrying failed attempts.
    async fn run_task(&self, state: &RunState<'_>, phase_index: usize, task_id: String) {
        // Checked once the task holds a slot, i.e. right before dispatch.
        if self.cancel.is_cancelled() {
            self.finish_task(state, TaskResult::skipped(task_id, TaskError::RunCancelled));
            return;
        }

        let Some(task) = state.graph.get(&task_id) else {
            let now = Utc::now();
            let err = TaskError::Failed("task not found in graph".to_string());
            self.finish_task(state, TaskResult::failed(task_id, now, now, 0, err));
            return;
        };

        let dependency_outputs = state.ledger.outputs_for(task.depends_on.iter());
        let started_at = Utc::now();
        let mut attempt: u32 = 0;

        let outcome: Result<Value, TaskError> = loop {
            attempt += 1;

            self.emit(RenderEvent::TaskStart {
                run_id: state.run_id.to_string(),
                task_id: task_id.clone(),
                phase_index,
                attempt,
            });
            if let Ok(mut monitor) = state.progress.lock() {
                monitor.start_task(&task_id, attempt);
            }

            let ctx = TaskContext {
                run_id: state.run_id.to_string(),
                phase_index,
                attempt,
                cancel: self.cancel.child_token(),
                dependency_outputs: dependency_outputs.clone(),
            };

            let err = match self.attempt_once(state.executor, task, &ctx).await {
                Ok(output) => break Ok(output),
                Err(err) => err,
            };

            let retries_used = attempt - 1;
            if retries_used >= task.max_retries
                || self.cancel.is_cancelled()
                || !self.retry_strategy.should_retry(attempt, &err)
            {
                break Err(err);
            }
            let Some(delay) = self.retry_strategy.next_delay(attempt, &err) else {
                break Err(err);
            };

            self.emit(RenderEvent::TaskRetry {
                run_id: state.run_id.to_string(),
                task_id: task_id.clone(),
                attempt,
                delay_ms: saturating_millis(delay),
                error: err.clone(),
            });

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.cancel.cancelled() => break Err(err),
            }
        };

        let finished_at = Utc::now();
        let result = match outcome {
            Ok(output) => TaskResult::success(task_id, started_at, finished_at, attempt, output),
            Err(err) => TaskResult::failed(task_id, started_at, finished_at, attempt, err),
        };
        self.finish_task(state, result);
    }

    /// One bounded executor call. On timeout the attempt's token is cancelled
    /// and the in-flight future is dropped.
    async fn attempt_once(
        &self,
        executor: &dyn TaskExecutor,
        task: &TaskDescriptor,
        ctx: &TaskContext,
    ) -> Result<Value, TaskError> {
        match tokio::time::timeout(self.opts.task_timeout, executor.execute(task, ctx)).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(TaskError::from(err)),
            Err(_) => {
                ctx.cancel.cancel();
                Err(TaskError::TimeoutExceeded {
                    timeout_ms: saturating_millis(self.opts.task_timeout),
                })
            }
        }
    }

    fn finish_task(&self, state: &RunState<'_>, result: TaskResult) {
        if let Ok(mut monitor) = state.progress.lock() {
            monitor.complete_task(&result.task_id, result.status, result.duration_ms());
        }
        self.emit(RenderEvent::TaskComplete {
            run_id: state.run_id.to_string(),
            result: result.clone(),
        });
        state.ledger.record(result);
    }

    fn emit(&self, event: RenderEvent) {
        match &self.renderer {
            Some(renderer) => renderer.render(&event),
            None => emit_event(&event),
        }
    }
}

impl ExecutionEngineBuilder {
    pub fn new(opts: ExecutionOptions) -> Self {
        Self {
            opts,
            renderer: None,
            retry_strategy: Arc::new(FixedBackoff::default()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn renderer(mut self, renderer: Arc<dyn OutputRendererPlugin>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn retry_strategy(mut self, strategy: Arc<dyn RetryStrategyPlugin>) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Use a caller-owned cancellation token.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn build(self) -> ExecutionEngine {
        ExecutionEngine {
            opts: self.opts,
            renderer: self.renderer,
            retry_strategy: self.retry_strategy,
            cancel: self.cancel,
        }
    }
}

/// First dependency (in id order) that did not finish successfully.
fn first_unsatisfied_dependency(
    graph: &TaskGraph,
    ledger: &RunLedger,
    task_id: &str,
) -> Option<String> {
    let task = graph.get(task_id)?;
    task.depends_on
        .iter()
        .find(|dep| ledger.status_of(dep) != Some(TaskStatus::Success))
        .cloned()
}

/// Build, plan and execute tasks with the default engine
///
/// This is the main entry point for one-off runs.
///
/// # Arguments
///
/// * `descriptors` - Tasks to run
/// * `executor` - Performs the work of a single task
/// * `concurrency_limit` - Maximum number of tasks in flight
/// * `task_timeout` - Bound on each attempt of each task
pub async fn plan_and_execute(
    descriptors: Vec<TaskDescriptor>,
    executor: &dyn TaskExecutor,
    concurrency_limit: usize,
    task_timeout: std::time::Duration,
) -> Result<RunSummary, SchedulerError> {
    let engine = ExecutionEngine::new(ExecutionOptions::new(concurrency_limit, task_timeout));
    engine.plan_and_execute(descriptors, executor).await
}

/// Execute already-planned phases with the default engine.
pub async fn execute(
    phases: &[Phase],
    graph: &TaskGraph,
    executor: &dyn TaskExecutor,
    concurrency_limit: usize,
    task_timeout: std::time::Duration,
) -> RunSummary {
    let engine = ExecutionEngine::new(ExecutionOptions::new(concurrency_limit, task_timeout));
    engine.execute(phases, graph, executor).await
}
