//! Deduplicating graph assembly using petgraph.
//!
//! Nodes are keyed by id: the first insertion of an id wins and later
//! insertions return the existing index untouched. Edges are keyed by
//! their `(source, target)` pair. Both endpoints must exist before an edge
//! can be added.

use std::collections::HashMap;

use log::debug;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;

use super::model::{Edge, Graph, Node, NodeKind};

/// Accumulates nodes and edges during a single run.
///
/// A `StableDiGraph` keeps the indices of surviving nodes valid when
/// nodes are removed, so insertion order carries through to [`Graph`].
///
/// # Example
///
/// ```rust
/// use goraph::graph::{GraphBuilder, NodeKind};
///
/// let mut builder = GraphBuilder::new();
/// builder.add_node("pkg:root", "main", NodeKind::Package, 0);
/// builder.add_node("a.io/x", "a.io/x", NodeKind::External, 2);
///
/// assert!(builder.add_edge("pkg:root", "a.io/x"));
/// assert!(!builder.add_edge("pkg:root", "a.io/x")); // duplicate
/// assert!(!builder.add_edge("pkg:root", "missing")); // unknown endpoint
///
/// let graph = builder.finish();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    graph: StableDiGraph<Node, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: StableDiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a node unless one with the same id exists.
    ///
    /// Returns the index of the new or existing node.
    pub fn add_node(&mut self, id: &str, label: &str, kind: NodeKind, depth: u32) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }

        let idx = self.graph.add_node(Node::new(id, label, kind, depth));
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    /// Adds the edge `from -> to`.
    ///
    /// Returns `true` if the edge is new, `false` if it already existed or
    /// either endpoint is unknown.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            debug!("Refusing edge {} -> {}: unknown endpoint", from, to);
            return false;
        };

        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Gets a node by id.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets a mutable node by id.
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.node_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight_mut(idx))
    }

    /// Checks if a node exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Returns true if the edge `from -> to` exists.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Number of edges pointing at `id`.
    pub fn in_degree(&self, id: &str) -> usize {
        self.node_indices.get(id).map_or(0, |&idx| {
            self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    /// Ids of the nodes with an edge pointing at `id`.
    pub fn predecessors(&self, id: &str) -> Vec<String> {
        self.node_indices.get(id).map_or_else(Vec::new, |&idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|n| self.graph[n].id.clone())
                .collect()
        })
    }

    /// Removes the given nodes together with their edges.
    ///
    /// Ids are collected up front by the caller, so no node is removed
    /// while its collection is being walked. Returns the number removed.
    pub fn remove_nodes<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0;
        for id in ids {
            if let Some(idx) = self.node_indices.remove(id.as_ref()) {
                self.graph.remove_node(idx);
                removed += 1;
            }
        }
        removed
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Freezes the builder into a [`Graph`] in insertion order.
    pub fn finish(self) -> Graph {
        let nodes = self
            .graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect();
        let edges = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| Edge::new(&self.graph[a].id, &self.graph[b].id))
            .collect();
        Graph { nodes, edges }
    }
}
