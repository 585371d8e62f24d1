//! Graph module for project dependency modeling.
//!
//! [`GraphBuilder`] accumulates deduplicated nodes and edges during a run;
//! [`Graph`] is the frozen, serializable result.
//!
//! # Example
//!
//! ```rust
//! use goraph::graph::{GraphBuilder, NodeKind};
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_node("example.com/app", "example.com/app", NodeKind::Main, 0);
//! builder.add_node("github.com/gorilla/websocket", "github.com/gorilla/websocket", NodeKind::External, 2);
//! builder.add_edge("example.com/app", "github.com/gorilla/websocket");
//!
//! let graph = builder.finish();
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod builder;
mod model;

pub use builder::GraphBuilder;
pub use model::{
    Edge, Graph, GraphSummary, Node, NodeKind, DEPTH_DIRECT, DEPTH_IMPORT, DEPTH_INDIRECT,
    DEPTH_LOCAL,
};
