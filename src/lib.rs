//! goraph - dependency graph builder for Go projects
//!
//! This crate reads a project's `go.mod`, scans the import declarations of
//! its source files, and builds a deduplicated graph of packages, internal
//! imports and external modules, ready for a force-directed visualizer.

pub mod analyze;
pub mod export;
pub mod graph;
pub mod manifest;
pub mod resolver;
pub mod scanner;

pub use analyze::{
    analyze_project, Analysis, AnalyzeError, AnalyzeResult, Analyzer, AnalyzerOptions, RunReport,
};
pub use graph::Graph;
