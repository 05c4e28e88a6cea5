use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::types::{TaskResult, TaskStatus};

/// Append-only, run-scoped result collection.
///
/// Each task's result is written exactly once by the worker that resolved
/// it. The mutex guards the append and lookups only, never task execution.
#[derive(Debug, Default)]
pub(crate) struct RunLedger {
    inner: Mutex<LedgerInner>,
}

#[derive(Debug, Default)]
struct LedgerInner {
    results: Vec<TaskResult>,
    index: HashMap<String, usize>,
}

impl RunLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record a terminal result. A second result for the same task is dropped.
    pub(crate) fn record(&self, result: TaskResult) -> bool {
        let mut inner = self.lock();
        if inner.index.contains_key(&result.task_id) {
            tracing::warn!(task_id = %result.task_id, "duplicate task result ignored");
            return false;
        }
        let pos = inner.results.len();
        inner.index.insert(result.task_id.clone(), pos);
        inner.results.push(result);
        true
    }

    pub(crate) fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        let inner = self.lock();
        inner
            .index
            .get(task_id)
            .map(|&pos| inner.results[pos].status)
    }

    /// Outputs of the given tasks that finished successfully.
    pub(crate) fn outputs_for<'a, I>(&self, task_ids: I) -> HashMap<String, Value>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let inner = self.lock();
        task_ids
            .into_iter()
            .filter_map(|id| {
                let result = &inner.results[*inner.index.get(id)?];
                result.output.clone().map(|out| (id.clone(), out))
            })
            .collect()
    }

    pub(crate) fn snapshot(&self) -> Vec<TaskResult> {
        self.lock().results.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_record_once() {
        let ledger = RunLedger::new();
        assert!(ledger.record(TaskResult::skipped("a", TaskError::RunCancelled)));
        assert!(!ledger.record(TaskResult::skipped("a", TaskError::RunCancelled)));
        assert_eq!(ledger.snapshot().len(), 1);
        assert_eq!(ledger.status_of("a"), Some(TaskStatus::Skipped));
        assert_eq!(ledger.status_of("b"), None);
    }

    #[test]
    fn test_outputs_only_for_successes() {
        let ledger = RunLedger::new();
        let now = Utc::now();
        ledger.record(TaskResult::success("a", now, now, 1, json!({"n": 1})));
        ledger.record(TaskResult::failed("b", now, now, 1, TaskError::Failed("x".into())));

        let deps = ["a".to_string(), "b".to_string(), "c".to_string()];
        let outputs = ledger.outputs_for(deps.iter());
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs["a"], json!({"n": 1}));
    }
}
