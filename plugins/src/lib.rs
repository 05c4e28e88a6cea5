//! Pluggable pieces for the agentflow scheduler: retry strategies, output
//! renderers, an agent registry executor, config-driven factories and
//! logging setup.

pub mod executor;
pub mod factory;
pub mod logging;
pub mod registry;

pub use registry::AgentRegistry;
