//! Dependency graph for tasks
//!
//! Diagnoses cycles once resolution has stalled. Uses petgraph for graph
//! operations.
//!
//! Edges point from a dependency to its dependent, so `A -> B` reads
//! "A must run before B".

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use super::task::Task;

/// A dependency graph over task names
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph; node indices follow input order
    graph: DiGraph<String, ()>,

    /// Map from task name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Builds a graph from a task list
    ///
    /// Names are expected to be unique; a repeated name keeps its first
    /// node. Dependencies on undeclared names have no node to point from
    /// and are dropped.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut graph = Self::default();

        for task in tasks {
            if !graph.node_map.contains_key(&task.name) {
                let idx = graph.graph.add_node(task.name.clone());
                graph.node_map.insert(task.name.clone(), idx);
            }
        }

        for task in tasks {
            let task_idx = graph.node_map[&task.name];
            for dep in &task.dependencies {
                if let Some(&dep_idx) = graph.node_map.get(dep) {
                    graph.graph.update_edge(dep_idx, task_idx, ());
                }
            }
        }

        graph
    }

    /// Returns every dependency cycle in the graph
    ///
    /// A cycle is a strongly connected component with more than one task,
    /// or a single task that depends on itself. Members are listed in input
    /// order and cycles are ordered by the position of their first member.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();

        components.sort_unstable_by_key(|scc| scc[0]);

        components
            .into_iter()
            .map(|scc| {
                scc.into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect()
            })
            .collect()
    }
}
