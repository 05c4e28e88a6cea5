//! Dependency-aware parallel task scheduler.
//!
//! Task descriptors with declared dependencies are validated into a
//! [`executor::TaskGraph`], layered into phases, and executed phase by phase
//! with bounded concurrency. Failures propagate forward as skips instead of
//! aborting the run; the final [`executor::RunSummary`] reports what happened.

pub mod api;
pub mod config;
pub mod error;
pub mod executor;
