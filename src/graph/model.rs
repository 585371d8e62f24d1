//! The finished graph handed to exporters and the transport layer.
//!
//! Field names follow the JSON wire format the visualizer consumes:
//! nodes are `{id, label, x, y, vx, vy, type, depth}` and edges are
//! `{source, target}`. Position and velocity are always zero here; they
//! belong to whatever renders the graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout depth of project-local nodes (main module, packages, internal imports).
pub const DEPTH_LOCAL: u32 = 0;
/// Layout depth of external import leaves.
pub const DEPTH_IMPORT: u32 = 1;
/// Layout depth of direct dependency modules.
pub const DEPTH_DIRECT: u32 = 2;
/// Layout depth of indirect dependency modules.
pub const DEPTH_INDIRECT: u32 = 3;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The project's own module.
    Main,
    /// A directory of source files in the project.
    Package,
    /// An import of a package inside the project's module.
    Internal,
    /// A declared dependency module, or an import inside one.
    External,
}

impl NodeKind {
    /// Returns the wire name of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Main => "main",
            NodeKind::Package => "package",
            NodeKind::Internal => "internal",
            NodeKind::External => "external",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A graph vertex. The `id` is its identity; everything else is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub depth: u32,
}

impl Node {
    /// Creates a node at the origin with no velocity.
    ///
    /// # Example
    ///
    /// ```
    /// use goraph::graph::{Node, NodeKind};
    ///
    /// let node = Node::new("pkg:root", "main", NodeKind::Package, 0);
    /// assert_eq!(node.id, "pkg:root");
    /// assert_eq!(node.x, 0.0);
    /// ```
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: NodeKind,
        depth: u32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            kind,
            depth,
        }
    }
}

/// A directed "source imports target" relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Node and edge counts of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub main: usize,
    pub packages: usize,
    pub internal: usize,
    pub external: usize,
    pub edges: usize,
}

/// The result of one analysis run, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns true if a node with `id` exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if the edge `source -> target` exists.
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    /// Edges pointing at `id`.
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == id)
    }

    /// Edges leaving `id`.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Nodes of one kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counts nodes per kind.
    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary {
            edges: self.edges.len(),
            ..GraphSummary::default()
        };
        for node in &self.nodes {
            match node.kind {
                NodeKind::Main => summary.main += 1,
                NodeKind::Package => summary.packages += 1,
                NodeKind::Internal => summary.internal += 1,
                NodeKind::External => summary.external += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        Graph {
            nodes: vec![
                Node::new("example.com/app", "example.com/app", NodeKind::Main, DEPTH_LOCAL),
                Node::new("pkg:root", "main", NodeKind::Package, DEPTH_LOCAL),
                Node::new("a.io/x", "a.io/x", NodeKind::External, DEPTH_DIRECT),
            ],
            edges: vec![
                Edge::new("pkg:root", "a.io/x"),
                Edge::new("example.com/app", "a.io/x"),
            ],
        }
    }

    #[test]
    fn test_node_kind_label() {
        assert_eq!(NodeKind::Main.label(), "main");
        assert_eq!(NodeKind::Package.label(), "package");
        assert_eq!(NodeKind::Internal.label(), "internal");
        assert_eq!(format!("{}", NodeKind::External), "external");
    }

    #[test]
    fn test_node_serializes_wire_names() {
        let node = Node::new("import:a.io/x/y", "a.io/x/y", NodeKind::External, DEPTH_IMPORT);
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["id"], "import:a.io/x/y");
        assert_eq!(value["type"], "external");
        assert_eq!(value["depth"], 1);
        assert_eq!(value["vx"], 0.0);
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_graph_roundtrip_shape() {
        let graph = sample();
        let json = serde_json::to_string(&graph).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_lookups() {
        let graph = sample();
        assert!(graph.contains_node("a.io/x"));
        assert!(!graph.contains_node("b.io/y"));
        assert!(graph.contains_edge("pkg:root", "a.io/x"));
        assert!(!graph.contains_edge("a.io/x", "pkg:root"));
        assert_eq!(graph.incoming("a.io/x").count(), 2);
        assert_eq!(graph.outgoing("pkg:root").count(), 1);
        assert_eq!(graph.nodes_of_kind(NodeKind::External).count(), 1);
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(
            summary,
            GraphSummary {
                main: 1,
                packages: 1,
                internal: 0,
                external: 1,
                edges: 2,
            }
        );
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
