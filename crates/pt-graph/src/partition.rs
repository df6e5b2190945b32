//! Splitting a graph into independently solvable branches.

use std::collections::BTreeMap;

use petgraph::unionfind::UnionFind;
use pt_core::InstanceId;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Connection, Graph};

/// One connected component of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Member instances, sorted.
    pub nodes: Vec<InstanceId>,
    /// Connections between members, in graph order.
    pub edges: Vec<Connection>,
}

impl Branch {
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.nodes.binary_search(id).is_ok()
    }

    /// Smallest member id; branches are ordered by it.
    pub fn first(&self) -> Option<&InstanceId> {
        self.nodes.first()
    }
}

/// Connected components, ignoring edge direction.
///
/// Every instance lands in exactly one branch and every connection in the
/// branch of its endpoints. Branches come out sorted by smallest member id.
pub fn partition(graph: &Graph) -> Vec<Branch> {
    let index = graph.index();
    let mut sets = UnionFind::<usize>::new(index.len());
    for connection in graph.connections() {
        // Endpoints were checked at build time.
        if let (Some(a), Some(b)) = (
            index.get(&connection.from.instance),
            index.get(&connection.to.instance),
        ) {
            sets.union(a, b);
        }
    }

    let mut groups: BTreeMap<usize, Branch> = BTreeMap::new();
    for (i, id) in index.ids().iter().enumerate() {
        groups
            .entry(sets.find(i))
            .or_insert_with(|| Branch {
                nodes: Vec::new(),
                edges: Vec::new(),
            })
            .nodes
            .push(id.clone());
    }
    for connection in graph.connections() {
        if let Some(i) = index.get(&connection.from.instance)
            && let Some(branch) = groups.get_mut(&sets.find(i))
        {
            branch.edges.push(connection.clone());
        }
    }

    let mut branches: Vec<Branch> = groups
        .into_values()
        .map(|mut branch| {
            branch.nodes.sort();
            branch
        })
        .collect();
    branches.sort_by(|a, b| a.first().cmp(&b.first()));

    tracing::debug!(graph = graph.name(), branches = branches.len(), "partitioned graph");
    branches
}

/// The branch containing `seed`.
pub fn extract_single_branch(graph: &Graph, seed: &InstanceId) -> GraphResult<Branch> {
    if !graph.contains(seed) {
        return Err(GraphError::UnknownInstance { id: seed.clone() });
    }
    partition(graph)
        .into_iter()
        .find(|branch| branch.contains(seed))
        .ok_or_else(|| GraphError::UnknownInstance { id: seed.clone() })
}
