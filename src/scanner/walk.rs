//! Lazy traversal of a Go project tree.

use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::imports::{ImportParser, ScanResult};

/// Extension of the files the scanner reads.
pub const SOURCE_EXTENSION: &str = "go";

/// Prefix of every package node id.
pub const PACKAGE_PREFIX: &str = "pkg:";

/// Package id suffix reserved for the project root directory.
pub const ROOT_PACKAGE: &str = "root";

/// Display name of the root package.
pub const ROOT_LABEL: &str = "main";

/// Which directories a scan descends into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names pruned wherever they appear below the root.
    pub skip_dirs: Vec<String>,
    /// Descend into `.`- and `_`-prefixed directories.
    pub include_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_dirs: vec!["vendor".to_string(), "testdata".to_string()],
            include_hidden: false,
        }
    }
}

/// A successfully parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file as walked.
    pub path: PathBuf,
    /// Id of the package node for the file's directory.
    pub package_id: String,
    /// Display label of that package node.
    pub label: String,
    /// Name from the file's `package` clause.
    pub package_name: String,
    /// Import paths in declaration order.
    pub imports: Vec<String>,
}

/// One `(package, import)` observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFact {
    pub package_id: String,
    pub label: String,
    pub import_path: String,
}

/// Counters kept while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_parsed: usize,
    pub files_skipped: usize,
    pub walk_errors: usize,
}

/// Iterator over the parsed source files of a project, in file-name order.
///
/// Each call to `next` walks until the next readable `.go` file. Files
/// that cannot be read or parsed are logged and skipped.
pub struct SourceScanner {
    root: PathBuf,
    walker: walkdir::IntoIter,
    parser: ImportParser,
    options: ScanOptions,
    stats: ScanStats,
}

impl SourceScanner {
    /// Create a scanner rooted at `root`.
    pub fn new(root: &Path, options: ScanOptions) -> ScanResult<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
            parser: ImportParser::new()?,
            options,
            stats: ScanStats::default(),
        })
    }

    /// Counters for the files seen so far.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Flatten the scan into `(package, import)` facts.
    pub fn facts(self) -> impl Iterator<Item = ImportFact> {
        self.flat_map(|file| {
            let SourceFile {
                package_id,
                label,
                imports,
                ..
            } = file;
            imports.into_iter().map(move |import_path| ImportFact {
                package_id: package_id.clone(),
                label: label.clone(),
                import_path,
            })
        })
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if !self.options.include_hidden && (name.starts_with('.') || name.starts_with('_')) {
            return true;
        }
        self.options.skip_dirs.iter().any(|skip| *skip == name)
    }
}

impl Iterator for SourceScanner {
    type Item = SourceFile;

    fn next(&mut self) -> Option<SourceFile> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    self.stats.walk_errors += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() > 0 && self.is_skipped_dir(&entry) {
                    debug!("Pruning {}", entry.path().display());
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if !is_source_file(entry.path()) {
                continue;
            }

            match self.parser.parse_file(entry.path()) {
                Ok(header) => {
                    self.stats.files_parsed += 1;
                    let dir = entry.path().parent().unwrap_or(self.root.as_path());
                    let (package_id, label) = package_identity(&self.root, dir);
                    return Some(SourceFile {
                        path: entry.into_path(),
                        package_id,
                        label,
                        package_name: header.package,
                        imports: header.imports,
                    });
                }
                Err(err) => {
                    warn!("Skipping {}: {}", entry.path().display(), err);
                    self.stats.files_skipped += 1;
                }
            }
        }
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

/// Package node id and label for a directory under `root`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use goraph::scanner::package_identity;
///
/// let root = Path::new("/work/app");
/// assert_eq!(
///     package_identity(root, Path::new("/work/app/internal/store")),
///     ("pkg:internal/store".to_string(), "store".to_string())
/// );
/// assert_eq!(
///     package_identity(root, root),
///     ("pkg:root".to_string(), "main".to_string())
/// );
/// ```
pub fn package_identity(root: &Path, dir: &Path) -> (String, String) {
    let segments: Vec<String> = dir
        .strip_prefix(root)
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    match segments.last() {
        Some(last) => (
            format!("{}{}", PACKAGE_PREFIX, segments.join("/")),
            last.clone(),
        ),
        None => (
            format!("{}{}", PACKAGE_PREFIX, ROOT_PACKAGE),
            ROOT_LABEL.to_string(),
        ),
    }
}
