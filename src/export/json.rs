//! JSON export implementation.
//!
//! The graph serializes as `{"nodes": [...], "edges": [...]}`. A consumer
//! that receives graphs over a message channel gets them wrapped in a
//! [`GraphMessage`]: `{"graph": {...}}` on success, `{"error": "..."}`
//! on failure.

use super::Exporter;
use crate::graph::Graph;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
#[derive(Debug, Clone, Copy)]
pub struct JsonExporter {
    /// Indent the output.
    pub pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    /// Single-line output, one document per line.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Writes any serializable value followed by a newline.
    pub fn write_value<T: Serialize + ?Sized, W: Write>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> io::Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }

    /// Writes a message envelope.
    pub fn export_message<W: Write>(
        &self,
        message: &GraphMessage<'_>,
        writer: &mut W,
    ) -> io::Result<()> {
        self.write_value(message, writer)
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &Graph, writer: &mut W) -> io::Result<()> {
        self.write_value(graph, writer)
    }
}

/// Envelope for sending a result to a graph consumer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMessage<'a> {
    /// A finished graph.
    Graph(&'a Graph),
    /// A failed run, with a human-readable reason.
    Error(String),
}

impl<'a> GraphMessage<'a> {
    /// Wraps an error's display text.
    pub fn error(err: impl std::fmt::Display) -> Self {
        GraphMessage::Error(err.to_string())
    }
}

impl<'a> From<&'a Graph> for GraphMessage<'a> {
    fn from(graph: &'a Graph) -> Self {
        GraphMessage::Graph(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeKind};

    fn create_test_graph() -> Graph {
        let mut builder = GraphBuilder::new();
        builder.add_node("example.com/app", "example.com/app", NodeKind::Main, 0);
        builder.add_node("pkg:root", "main", NodeKind::Package, 0);
        builder.add_node("a.io/x", "a.io/x", NodeKind::External, 2);
        builder.add_edge("pkg:root", "a.io/x");
        builder.add_edge("example.com/app", "a.io/x");
        builder.finish()
    }

    fn to_value(exporter: JsonExporter, graph: &Graph) -> serde_json::Value {
        let mut output = Vec::new();
        exporter.export(graph, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_json_export_shape() {
        let parsed = to_value(JsonExporter::default(), &create_test_graph());

        let nodes = parsed["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1]["id"], "pkg:root");
        assert_eq!(nodes[1]["label"], "main");
        assert_eq!(nodes[1]["type"], "package");
        assert_eq!(nodes[2]["depth"], 2);
        for key in ["x", "y", "vx", "vy"] {
            assert_eq!(nodes[0][key], 0.0);
        }

        let edges = parsed["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0]["source"], "pkg:root");
        assert_eq!(edges[0]["target"], "a.io/x");
    }

    #[test]
    fn test_compact_is_single_line() {
        let graph = create_test_graph();
        let mut output = Vec::new();
        JsonExporter::compact().export(&graph, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(
            to_value(JsonExporter::compact(), &graph),
            to_value(JsonExporter::default(), &graph)
        );
    }

    #[test]
    fn test_empty_graph() {
        let parsed = to_value(JsonExporter::default(), &Graph::new());
        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 0);
        assert_eq!(parsed["edges"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_graph_envelope() {
        let graph = create_test_graph();
        let mut output = Vec::new();
        JsonExporter::compact()
            .export_message(&GraphMessage::from(&graph), &mut output)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(parsed["graph"]["nodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_error_envelope() {
        let mut output = Vec::new();
        JsonExporter::compact()
            .export_message(&GraphMessage::error("Path 'nope' is not accessible"), &mut output)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["error"], "Path 'nope' is not accessible");
        assert!(parsed.get("graph").is_none());
    }
}
