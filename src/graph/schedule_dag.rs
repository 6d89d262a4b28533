use crate::dependency::{Dependency, DependencyType};
use crate::id::TaskId;
use crate::task::Task;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Dependency graph over one snapshot of tasks.
///
/// Nodes borrow the tasks; edges run predecessor -> successor and carry the
/// dependency type. Built fresh for every computation and never stored.
pub struct ScheduleDag<'a> {
    pub graph: DiGraph<&'a Task, DependencyType>,
    pub id_to_index: HashMap<&'a TaskId, NodeIndex>,
}

impl<'a> ScheduleDag<'a> {
    pub fn build(tasks: &'a [Task], dependencies: &[Dependency]) -> Self {
        let mut graph: DiGraph<&'a Task, DependencyType> =
            DiGraph::with_capacity(tasks.len(), dependencies.len());
        let mut id_to_index: HashMap<&'a TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());

        // Add nodes first
        for task in tasks {
            if id_to_index.contains_key(&task.id) {
                tracing::debug!(task = %task.id, "duplicate task id ignored in dependency graph");
                continue;
            }
            let node_ix = graph.add_node(task);
            id_to_index.insert(&task.id, node_ix);
        }

        // Add edges: source -> target, skipping anything that points nowhere
        for dependency in dependencies {
            if dependency.is_self_loop() {
                tracing::debug!(dependency = %dependency.id, "self dependency dropped");
                continue;
            }
            match (
                id_to_index.get(&dependency.source_id),
                id_to_index.get(&dependency.target_id),
            ) {
                (Some(&u), Some(&v)) => {
                    graph.add_edge(u, v, dependency.kind);
                }
                _ => {
                    tracing::debug!(
                        dependency = %dependency.id,
                        source = %dependency.source_id,
                        target = %dependency.target_id,
                        "dangling dependency dropped"
                    );
                }
            }
        }

        Self { graph, id_to_index }
    }

    pub fn node(&self, task_id: &TaskId) -> Option<NodeIndex> {
        self.id_to_index.get(task_id).copied()
    }

    pub fn task(&self, node: NodeIndex) -> &'a Task {
        self.graph[node]
    }

    pub fn successors(&self, task_id: &TaskId) -> Vec<&'a TaskId> {
        let Some(node) = self.node(task_id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|succ| &self.graph[succ].id)
            .collect()
    }

    /// Adjacency as plain ids: every task maps to its successor ids.
    pub fn successor_map(&self) -> HashMap<&'a TaskId, Vec<&'a TaskId>> {
        self.graph
            .node_indices()
            .map(|node| {
                let successors = self
                    .graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .map(|succ| &self.graph[succ].id)
                    .collect();
                (&self.graph[node].id, successors)
            })
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
