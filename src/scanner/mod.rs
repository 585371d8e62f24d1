//! Source import scanning for goraph.
//!
//! This module walks a Go project and reports, for every parsable `.go`
//! file, the package it belongs to and the paths it imports.
//!
//! # Features
//!
//! - Imports-only parsing: file bodies are never parsed
//! - Grouped, aliased, dot and blank imports
//! - Pruning of `vendor`, `testdata` and hidden directories
//! - Lazy iteration: one file is parsed per `next()`
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use goraph::scanner::{ScanOptions, SourceScanner};
//!
//! let scanner = SourceScanner::new(Path::new("."), ScanOptions::default())?;
//! for file in scanner {
//!     println!("{}: {:?}", file.package_id, file.imports);
//! }
//! ```

pub mod imports;
pub mod walk;

pub use imports::{header_len, FileImports, ImportParser, ScanError, ScanResult};
pub use walk::{
    package_identity, ImportFact, ScanOptions, ScanStats, SourceFile, SourceScanner,
    PACKAGE_PREFIX, ROOT_LABEL, ROOT_PACKAGE, SOURCE_EXTENSION,
};
