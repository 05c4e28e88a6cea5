use std::collections::BTreeMap;
use std::sync::Arc;

use agentflow_core::executor::traits::{TaskContext, TaskExecutor};
use agentflow_core::executor::types::TaskDescriptor;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;

pub const DEFAULT_ROUTING_KEY: &str = "agent";

/// Routes each task to a named executor.
///
/// The executor name is read from `payload[routing_key]`. Tasks without that
/// key (or with a non-string value) go to the default executor, if any.
pub struct AgentRegistry {
    routing_key: String,
    agents: BTreeMap<String, Arc<dyn TaskExecutor>>,
    default: Option<Arc<dyn TaskExecutor>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            routing_key: DEFAULT_ROUTING_KEY.to_string(),
            agents: BTreeMap::new(),
            default: None,
        }
    }

    pub fn with_routing_key(mut self, key: impl Into<String>) -> Self {
        self.routing_key = key.into();
        self
    }

    pub fn register(mut self, name: impl Into<String>, executor: Arc<dyn TaskExecutor>) -> Self {
        self.agents.insert(name.into(), executor);
        self
    }

    pub fn with_default(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.default = Some(executor);
        self
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    fn route(&self, task: &TaskDescriptor) -> Result<(&str, &Arc<dyn TaskExecutor>)> {
        match task.payload.get(&self.routing_key).and_then(Value::as_str) {
            Some(name) => self
                .agents
                .get_key_value(name)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| anyhow!("no agent registered under '{}'", name)),
            None => self
                .default
                .as_ref()
                .map(|exec| ("default", exec))
                .ok_or_else(|| {
                    anyhow!(
                        "task '{}' has no '{}' in its payload and no default agent is set",
                        task.id,
                        self.routing_key
                    )
                }),
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskExecutor for AgentRegistry {
    async fn execute(&self, task: &TaskDescriptor, ctx: &TaskContext) -> Result<Value> {
        let (name, executor) = self.route(task)?;
        tracing::debug!(task_id = %task.id, agent = name, attempt = ctx.attempt, "dispatching task");
        executor
            .execute(task, ctx)
            .await
            .with_context(|| format!("agent '{}'", name))
    }
}
