//! Dependency-aware parallel task execution
//!
//! This module turns a flat list of task descriptors into a validated DAG,
//! partitions it into phases and runs each phase with bounded concurrency.
//! It supports:
//! - Task dependency graph construction and validation
//! - Circular dependency detection with a witness path
//! - Phase planning (Kahn layering, sorted within each phase)
//! - Parallel task scheduling with concurrency control, timeouts and retries
//! - Skip propagation and cooperative cancellation
//! - Run summaries with wall-clock and sequential estimates
//!
//! # Architecture
//!
//! ```text
//! Vec<TaskDescriptor>
//!   ↓
//! TaskGraph::build() → duplicate ids, unknown deps, detect_cycle()
//!   ↓
//! TaskGraph { nodes, dependents, insertion_order }
//!   ↓
//! planner::plan() → Vec<Phase> (execution phases)
//!   ↓
//! ExecutionEngine::execute() → Vec<TaskResult>
//!   ↓
//! summarize() → RunSummary
//! ```

mod engine;
mod graph;
mod ledger;
mod output;
mod planner;
mod progress;
mod scheduler;
mod summary;
pub mod traits;
pub mod types;

pub use engine::{execute, plan_and_execute, ExecutionEngine, ExecutionEngineBuilder};
pub use graph::{build, TaskGraph};
pub use output::emit_event;
pub use planner::{phase_index, plan, Phase};
pub use progress::ProgressMonitor;
pub use scheduler::execute_phase_parallel;
pub use summary::summarize;
pub use traits::{
    executor_fn, FixedBackoff, FnExecutor, OutputRendererPlugin, RenderEvent,
    RetryStrategyPlugin, TaskContext, TaskExecutor,
};
pub use types::{ExecutionOptions, RunSummary, TaskDescriptor, TaskResult, TaskStatus};
