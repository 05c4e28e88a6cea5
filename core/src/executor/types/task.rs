use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of work submitted to a run.
///
/// `payload` is carried through to the executor untouched; the scheduler
/// only looks at `id`, `depends_on` and `max_retries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub id: String,

    /// Tasks that must finish successfully before this one may start.
    #[serde(default)]
    pub depends_on: BTreeSet<String>,

    #[serde(default)]
    pub payload: Value,

    /// Additional attempts after the first failure.
    #[serde(default)]
    pub max_retries: u32,
}

impl TaskDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            depends_on: BTreeSet::new(),
            payload: Value::Null,
            max_retries: 0,
        }
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_defaults() {
        let task: TaskDescriptor = serde_json::from_value(json!({ "id": "lint" })).unwrap();
        assert_eq!(task, TaskDescriptor::new("lint"));
    }

    #[test]
    fn test_duplicate_dependencies_collapse() {
        let task = TaskDescriptor::new("b").depends_on(["a", "a", "c"]);
        assert_eq!(task.depends_on.len(), 2);
        assert_eq!(task.depends_on.iter().next().map(String::as_str), Some("a"));
    }
}
