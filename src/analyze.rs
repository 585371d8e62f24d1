//! One analysis run: read the manifest, scan sources, resolve imports,
//! then repair the module layer of the graph.
//!
//! All state lives in the run. Concurrent runs share nothing.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::graph::{
    Graph, GraphBuilder, NodeKind, DEPTH_DIRECT, DEPTH_IMPORT, DEPTH_INDIRECT, DEPTH_LOCAL,
};
use crate::manifest::{read_manifest, Manifest};
use crate::resolver::{
    base_name, classify, import_id, import_label, likely_parent, ImportClass,
    DEFAULT_LABEL_MAX_LEN, IMPORT_PREFIX,
};
use crate::scanner::{ScanError, ScanOptions, SourceFile, SourceScanner};

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Path '{}' is not accessible: {source}", .path.display())]
    RootUnreachable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Scanner(#[from] ScanError),
}

/// Result type for analysis runs.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Knobs for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Directory pruning rules for the source walk.
    pub scan: ScanOptions,
    /// External import paths longer than this get abbreviated labels.
    pub label_max_len: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            label_max_len: DEFAULT_LABEL_MAX_LEN,
        }
    }
}

/// What happened during a run, beyond the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub main_module: String,
    pub declared_modules: usize,
    pub files_parsed: usize,
    pub files_skipped: usize,
    pub walk_errors: usize,
    pub stdlib_imports: usize,
    pub unresolved_imports: usize,
    /// Declared modules some import resolved to, in first-use order.
    pub used_modules: Vec<String>,
    /// Indirect modules dropped for lack of a plausible parent.
    pub pruned_modules: Vec<String>,
}

/// A finished run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: Graph,
    pub report: RunReport,
}

/// Builds dependency graphs for Go projects.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use goraph::{Analyzer, AnalyzerOptions};
///
/// let graph = Analyzer::new(AnalyzerOptions::default()).analyze(Path::new("."))?;
/// println!("{} nodes, {} edges", graph.node_count(), graph.edge_count());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    /// Create an analyzer with the given options.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    /// The options this analyzer runs with.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Build the graph for the project at `root`.
    pub fn analyze(&self, root: &Path) -> AnalyzeResult<Graph> {
        Ok(self.run(root)?.graph)
    }

    /// Build the graph for the project at `root`, with run statistics.
    pub fn run(&self, root: &Path) -> AnalyzeResult<Analysis> {
        check_root(root)?;

        debug!("Reading manifest in {}", root.display());
        let manifest = read_manifest(root);
        let mut assembly = Assembly::new(&manifest, self.options.label_max_len);

        debug!("Scanning sources under {}", root.display());
        let mut scanner = SourceScanner::new(root, self.options.scan.clone())?;
        for file in scanner.by_ref() {
            assembly.add_file(&file);
        }
        let stats = scanner.stats();

        debug!("Repairing module layer");
        let pruned = assembly.repair();

        let report = RunReport {
            main_module: manifest.main_module.clone(),
            declared_modules: manifest.modules.len(),
            files_parsed: stats.files_parsed,
            files_skipped: stats.files_skipped,
            walk_errors: stats.walk_errors,
            stdlib_imports: assembly.stdlib_imports,
            unresolved_imports: assembly.unresolved_imports,
            used_modules: assembly.used.iter().map(|m| m.to_string()).collect(),
            pruned_modules: pruned,
        };
        let graph = assembly.builder.finish();

        info!(
            "Analyzed {}: {} files ({} skipped), {} nodes, {} edges, {} modules pruned",
            root.display(),
            report.files_parsed,
            report.files_skipped,
            graph.node_count(),
            graph.edge_count(),
            report.pruned_modules.len()
        );

        Ok(Analysis { graph, report })
    }
}

/// Build the graph for the project at `root` with default options.
pub fn analyze_project(root: &Path) -> AnalyzeResult<Graph> {
    Analyzer::default().analyze(root)
}

fn check_root(root: &Path) -> AnalyzeResult<()> {
    let unreachable = |source: io::Error| AnalyzeError::RootUnreachable {
        path: root.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(root).map_err(unreachable)?;
    if !metadata.is_dir() {
        return Err(AnalyzeError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(unreachable)?;
    Ok(())
}

/// Graph state for a single run.
struct Assembly<'m> {
    builder: GraphBuilder,
    manifest: &'m Manifest,
    used: Vec<&'m str>,
    used_set: HashSet<&'m str>,
    label_max_len: usize,
    stdlib_imports: usize,
    unresolved_imports: usize,
}

impl<'m> Assembly<'m> {
    fn new(manifest: &'m Manifest, label_max_len: usize) -> Self {
        let mut builder = GraphBuilder::new();
        if manifest.has_identity() {
            let main = manifest.main_module.as_str();
            builder.add_node(main, main, NodeKind::Main, DEPTH_LOCAL);
        }
        Self {
            builder,
            manifest,
            used: Vec::new(),
            used_set: HashSet::new(),
            label_max_len,
            stdlib_imports: 0,
            unresolved_imports: 0,
        }
    }

    fn add_file(&mut self, file: &SourceFile) {
        self.builder
            .add_node(&file.package_id, &file.label, NodeKind::Package, DEPTH_LOCAL);
        for import_path in &file.imports {
            self.add_import(&file.package_id, import_path);
        }
    }

    fn add_import(&mut self, package_id: &str, import_path: &str) {
        let manifest = self.manifest;
        match classify(import_path, &manifest.main_module, &manifest.modules) {
            ImportClass::StandardLibrary => self.stdlib_imports += 1,
            ImportClass::Internal => {
                let id = import_id(import_path);
                self.builder
                    .add_node(&id, base_name(import_path), NodeKind::Internal, DEPTH_LOCAL);
                self.builder.add_edge(package_id, &id);
            }
            ImportClass::External { module } => {
                if self.used_set.insert(module) {
                    self.used.push(module);
                }
                self.builder
                    .add_node(module, module, NodeKind::External, DEPTH_DIRECT);

                if import_path == module {
                    self.builder.add_edge(package_id, module);
                } else {
                    let id = import_id(import_path);
                    let label = import_label(import_path, self.label_max_len);
                    self.builder
                        .add_node(&id, &label, NodeKind::External, DEPTH_IMPORT);
                    self.builder.add_edge(package_id, &id);
                    self.builder.add_edge(&id, module);
                }
            }
            ImportClass::Unresolved => {
                debug!("No declared module owns {}", import_path);
                self.unresolved_imports += 1;
            }
        }
    }

    /// Connect used modules to the project, or drop them.
    ///
    /// Direct modules hang off the main module. Indirect modules hang off
    /// the first used direct module that looks like their parent (see
    /// [`likely_parent`]); those with no candidate are removed with their
    /// edges and with the import nodes they own. Returns the removed
    /// module paths.
    fn repair(&mut self) -> Vec<String> {
        let manifest = self.manifest;
        let main = manifest.main_module.as_str();
        let used_set = &self.used_set;
        let mut orphans = Vec::new();

        for &module in &self.used {
            if manifest.modules.is_direct(module) {
                self.builder.add_edge(main, module);
                continue;
            }

            let candidates = manifest
                .modules
                .direct_modules()
                .map(|m| m.path.as_str())
                .filter(|path| used_set.contains(path));

            match likely_parent(module, candidates) {
                Some(parent) => {
                    self.builder.add_edge(parent, module);
                    if let Some(node) = self.builder.get_node_mut(module) {
                        node.depth = DEPTH_INDIRECT;
                    }
                }
                None => {
                    debug!("Pruning indirect module {} with no plausible parent", module);
                    orphans.push(module.to_string());
                }
            }
        }

        let owned_imports: Vec<String> = orphans
            .iter()
            .flat_map(|module| self.builder.predecessors(module))
            .filter(|id| id.starts_with(IMPORT_PREFIX))
            .collect();
        self.builder.remove_nodes(owned_imports.iter().chain(&orphans));
        orphans
    }
}
