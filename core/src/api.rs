//! Stable re-exports for consumers (`plugins` and external crates).
//!
//! Prefer importing from `agentflow_core::api` instead of reaching into internal modules.

pub use tokio_util::sync::CancellationToken;

pub use crate::config::{AppConfig, LoggingConfig, OutputConfig, RetryConfig, SchedulerConfig};
pub use crate::error::{SchedulerError, TaskError};
pub use crate::executor::{
    build, emit_event, execute, execute_phase_parallel, executor_fn, phase_index, plan,
    plan_and_execute, summarize, ExecutionEngine, ExecutionEngineBuilder, ExecutionOptions,
    FixedBackoff, FnExecutor, OutputRendererPlugin, Phase, ProgressMonitor, RenderEvent,
    RetryStrategyPlugin, RunSummary, TaskContext, TaskDescriptor, TaskExecutor, TaskGraph,
    TaskResult, TaskStatus,
};
