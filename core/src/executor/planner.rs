use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::graph::TaskGraph;

/// A batch of tasks whose dependencies all live in earlier phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub index: usize,

    /// Sorted lexicographically; this is the dispatch order.
    pub task_ids: Vec<String>,
}

impl Phase {
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }
}

/// Partition a graph into execution phases (Kahn's algorithm).
///
/// # Algorithm
///
/// 1. In-degree of every task = number of its dependencies
/// 2. Phase 0 = all tasks with in-degree 0
/// 3. Decrement the in-degree of each dependent of the phase just emitted;
///    those reaching 0 form the next phase
/// 4. Repeat until no task is left
///
/// O(V + E). The graph is acyclic by construction, so every task is assigned
/// to exactly one phase. Output is deterministic for identical input.
pub fn plan(graph: &TaskGraph) -> Vec<Phase> {
    let mut in_degree: HashMap<&str, usize> = graph
        .iter()
        .map(|task| (task.id.as_str(), task.depends_on.len()))
        .collect();

    let mut current: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(id, _)| *id)
        .collect();
    current.sort_unstable();

    let mut phases = Vec::new();
    let mut assigned = 0;

    while !current.is_empty() {
        let mut next = Vec::new();
        for task_id in &current {
            for dependent in graph.dependents(task_id) {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        next.push(dependent.as_str());
                    }
                }
            }
        }
        next.sort_unstable();

        assigned += current.len();
        phases.push(Phase {
            index: phases.len(),
            task_ids: current.iter().map(|id| id.to_string()).collect(),
        });
        current = next;
    }

    debug_assert_eq!(assigned, graph.len(), "acyclic graph leaves no task unplanned");
    phases
}

/// Phase index of every task.
pub fn phase_index(phases: &[Phase]) -> HashMap<&str, usize> {
    phases
        .iter()
        .flat_map(|phase| phase.task_ids.iter().map(move |id| (id.as_str(), phase.index)))
        .collect()
}
