//! Graphviz DOT export implementation.

use super::Exporter;
use crate::graph::{Graph, NodeKind};
use std::io::{self, Write};

/// DOT exporter implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotExporter;

fn fill_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Main => "gold",
        NodeKind::Package => "lightblue",
        NodeKind::Internal => "palegreen",
        NodeKind::External => "lightgray",
    }
}

/// Quotes a string as a DOT identifier.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &Graph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph dependencies {{")?;
        writeln!(writer, "    rankdir=LR;")?;
        writeln!(writer, "    node [shape=box, style=filled];")?;

        for node in &graph.nodes {
            writeln!(
                writer,
                "    {} [label={}, fillcolor={}, rank={}];",
                quote(&node.id),
                quote(&node.label),
                fill_color(node.kind),
                node.depth
            )?;
        }

        for edge in &graph.edges {
            writeln!(writer, "    {} -> {};", quote(&edge.source), quote(&edge.target))?;
        }

        writeln!(writer, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn render(graph: &Graph) -> String {
        let mut output = Vec::new();
        DotExporter.export(graph, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_dot_nodes_and_edges() {
        let mut builder = GraphBuilder::new();
        builder.add_node("pkg:root", "main", NodeKind::Package, 0);
        builder.add_node("a.io/x", "a.io/x", NodeKind::External, 2);
        builder.add_edge("pkg:root", "a.io/x");
        let dot = render(&builder.finish());

        assert!(dot.starts_with("digraph dependencies {"));
        assert!(dot.contains("\"pkg:root\" [label=\"main\", fillcolor=lightblue, rank=0];"));
        assert!(dot.contains("\"a.io/x\" [label=\"a.io/x\", fillcolor=lightgray, rank=2];"));
        assert!(dot.contains("\"pkg:root\" -> \"a.io/x\";"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_empty_graph() {
        let dot = render(&Graph::new());
        assert_eq!(dot.lines().count(), 4);
    }
}
