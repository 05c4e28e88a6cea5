use std::collections::{btree_set, BTreeSet, HashMap};

use crate::error::SchedulerError;
use crate::executor::types::TaskDescriptor;

/// Task dependency graph (DAG) for one run.
///
/// Immutable once built: validation happens in [`TaskGraph::build`] and the
/// reverse edges are computed there, so lookups during scheduling are O(1).
#[derive(Debug, Clone)]
pub struct TaskGraph {
    /// Task nodes: task_id -> descriptor
    nodes: HashMap<String, TaskDescriptor>,

    /// Reverse edges: task_id -> tasks that depend on it (sorted)
    dependents: HashMap<String, Vec<String>>,

    /// Original insertion order
    insertion_order: Vec<String>,
}

static EMPTY_DEPS: BTreeSet<String> = BTreeSet::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

impl TaskGraph {
    /// Validate descriptors and construct the graph.
    ///
    /// Checks run in order: duplicate ids, unknown dependencies, cycles.
    /// The first violation is returned and no graph is produced.
    pub fn build(descriptors: Vec<TaskDescriptor>) -> Result<Self, SchedulerError> {
        let mut nodes = HashMap::with_capacity(descriptors.len());
        let mut insertion_order = Vec::with_capacity(descriptors.len());

        for task in descriptors {
            if nodes.contains_key(&task.id) {
                return Err(SchedulerError::DuplicateTaskId(task.id));
            }
            insertion_order.push(task.id.clone());
            nodes.insert(task.id.clone(), task);
        }

        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for task_id in &insertion_order {
            let task = &nodes[task_id];
            for dep in &task.depends_on {
                if !nodes.contains_key(dep) {
                    return Err(SchedulerError::UnknownDependency {
                        task_id: task_id.clone(),
                        missing_dep: dep.clone(),
                    });
                }
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(task_id.clone());
            }
        }
        for list in dependents.values_mut() {
            list.sort();
        }

        let graph = Self {
            nodes,
            dependents,
            insertion_order,
        };

        if let Some(cycle) = graph.detect_cycle() {
            return Err(SchedulerError::CyclicDependency(cycle));
        }

        Ok(graph)
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskDescriptor> {
        self.nodes.get(task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.nodes.contains_key(task_id)
    }

    /// Tasks that directly depend on `task_id`, sorted by id.
    pub fn dependents(&self, task_id: &str) -> &[String] {
        self.dependents
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Descriptors in the order they were supplied.
    pub fn iter(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Three-colour DFS over dependency edges.
    ///
    /// Returns the first cycle found as a closed path, e.g. `[a, b, a]`.
    fn detect_cycle(&self) -> Option<Vec<String>> {
        let mut colors: HashMap<&str, Color> = self
            .nodes
            .keys()
            .map(|id| (id.as_str(), Color::White))
            .collect();

        for task_id in &self.insertion_order {
            if colors.get(task_id.as_str()) == Some(&Color::White) {
                if let Some(cycle) = self.visit(task_id, &mut colors) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// Iterative DFS from `root`. The explicit stack holds the current path
    /// plus each node's remaining dependencies, so depth is bounded by heap.
    fn visit<'a>(
        &'a self,
        root: &'a str,
        colors: &mut HashMap<&'a str, Color>,
    ) -> Option<Vec<String>> {
        let mut stack: Vec<(&'a str, btree_set::Iter<'a, String>)> = Vec::new();
        colors.insert(root, Color::Gray);
        stack.push((root, self.dependencies_of(root)));

        loop {
            let next = match stack.last_mut() {
                Some((_, deps)) => deps.next(),
                None => return None,
            };

            let Some(dep) = next else {
                // all dependencies explored
                if let Some((node, _)) = stack.pop() {
                    colors.insert(node, Color::Black);
                }
                continue;
            };

            match colors.get(dep.as_str()).copied().unwrap_or(Color::White) {
                Color::Gray => {
                    // dep is on the current path: close the loop
                    let start = stack.iter().position(|(id, _)| *id == dep.as_str())?;
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|(id, _)| id.to_string()).collect();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
                Color::White => {
                    colors.insert(dep, Color::Gray);
                    stack.push((dep, self.dependencies_of(dep)));
                }
                Color::Black => {}
            }
        }
    }

    fn dependencies_of<'a>(&'a self, task_id: &str) -> btree_set::Iter<'a, String> {
        match self.nodes.get(task_id) {
            Some(task) => task.depends_on.iter(),
            None => EMPTY_DEPS.iter(),
        }
    }
}

/// Build a [`TaskGraph`] from descriptors.
pub fn build(descriptors: Vec<TaskDescriptor>) -> Result<TaskGraph, SchedulerError> {
    TaskGraph::build(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: &str, deps: &[&str]) -> TaskDescriptor {
        TaskDescriptor::new(id).depends_on(deps.iter().copied())
    }

    #[test]
    fn test_build_computes_dependents() {
        let graph = build(vec![task("a", &[]), task("c", &["a"]), task("b", &["a"])]).unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependents("a"), ["b".to_string(), "c".to_string()]);
        assert!(graph.dependents("b").is_empty());
        let order: Vec<_> = graph.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_duplicate_id() {
        let err = build(vec![task("a", &[]), task("a", &[])]).unwrap_err();
        assert_eq!(err, SchedulerError::DuplicateTaskId("a".into()));
    }

    #[test]
    fn test_unknown_dependency() {
        let err = build(vec![task("a", &["ghost"])]).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::UnknownDependency {
                task_id: "a".into(),
                missing_dep: "ghost".into(),
            }
        );
    }

    #[test]
    fn test_two_node_cycle_witness() {
        let err = build(vec![task("A", &["B"]), task("B", &["A"])]).unwrap_err();
        assert_eq!(
            err.cycle(),
            Some(&["A".to_string(), "B".to_string(), "A".to_string()][..])
        );
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let err = build(vec![task("a", &["a"])]).unwrap_err();
        assert_eq!(err.cycle(), Some(&["a".to_string(), "a".to_string()][..]));
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        // root -> x -> y -> z -> x
        let err = build(vec![
            task("root", &["x"]),
            task("x", &["y"]),
            task("y", &["z"]),
            task("z", &["x"]),
        ])
        .unwrap_err();

        let cycle = err.cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
        assert!(!cycle.contains(&"root".to_string()));
    }

    #[test]
    fn test_long_chain_builds_and_plans() {
        // supplied leaf-first so the search walks the whole chain in one descent
        let n = 100_000;
        let tasks: Vec<_> = (0..n)
            .rev()
            .map(|i| {
                let t = TaskDescriptor::new(format!("t{i}"));
                if i == 0 {
                    t
                } else {
                    t.depends_on([format!("t{}", i - 1)])
                }
            })
            .collect();

        let graph = build(tasks).unwrap();
        assert_eq!(graph.len(), n);

        let phases = crate::executor::planner::plan(&graph);
        assert_eq!(phases.len(), n);
        assert_eq!(phases[0].task_ids, vec!["t0".to_string()]);
        assert_eq!(phases[n - 1].task_ids, vec![format!("t{}", n - 1)]);
    }

    #[test]
    fn test_long_chain_closing_into_cycle() {
        let n = 50_000;
        let mut tasks: Vec<_> = (1..n)
            .map(|i| TaskDescriptor::new(format!("t{i}")).depends_on([format!("t{}", i - 1)]))
            .collect();
        tasks.push(TaskDescriptor::new("t0").depends_on([format!("t{}", n - 1)]));

        let err = build(tasks).unwrap_err();
        let cycle = err.cycle().unwrap();
        assert_eq!(cycle.len(), n + 1);
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let graph = build(vec![
            task("a", &[]),
            task("b", &["a"]),
            task("c", &["a"]),
            task("d", &["b", "c"]),
        ])
        .unwrap();
        assert_eq!(graph.dependents("a").len(), 2);
        assert_eq!(graph.dependents("c"), ["d".to_string()]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = build(Vec::new()).unwrap();
        assert!(graph.is_empty());
    }
}
