//! Manifest reading for goraph.
//!
//! Reads the project's `go.mod` to find the project's own module path and
//! the dependencies it declares, each flagged direct or indirect.
//!
//! A missing or malformed manifest is never an error for a run: the
//! project is analyzed without a module identity and without declared
//! dependencies.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use goraph::manifest::read_manifest;
//!
//! let manifest = read_manifest(Path::new("."));
//! for module in manifest.modules.iter() {
//!     println!("{} (direct: {})", module.path, module.direct);
//! }
//! ```

pub mod go_mod;
pub mod types;

use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};

pub use go_mod::{parse_file, parse_str, ParseError, ParseResult};
pub use types::{DeclaredModule, GoMod, Manifest, ModuleSet, Requirement};

/// File name of the manifest at the project root.
pub const MANIFEST_FILE: &str = "go.mod";

/// Reads the manifest under `root`, falling back to an empty one.
pub fn read_manifest(root: &Path) -> Manifest {
    let path = root.join(MANIFEST_FILE);
    match parse_file(&path) {
        Ok(gomod) => {
            let manifest = Manifest::from_go_mod(gomod);
            debug!(
                "Read {}: module {} with {} declared dependencies",
                path.display(),
                manifest.main_module,
                manifest.modules.len()
            );
            manifest
        }
        Err(ParseError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
            debug!("No {} in {}", MANIFEST_FILE, root.display());
            Manifest::default()
        }
        Err(err) => {
            warn!("Ignoring unusable {}: {}", path.display(), err);
            Manifest::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_manifest_missing() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = read_manifest(dir.path());

        assert!(!manifest.has_identity());
        assert!(manifest.modules.is_empty());
    }

    #[test]
    fn test_read_manifest_malformed_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "module example.com/app\nrequire (\n\ta.io/x v1.0.0\n",
        )
        .unwrap();

        let manifest = read_manifest(dir.path());
        assert!(!manifest.has_identity());
        assert!(manifest.modules.is_empty());
    }

    #[test]
    fn test_read_manifest_valid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "module example.com/app\n\nrequire (\n\ta.io/x v1.0.0\n\tb.io/y v2.0.0 // indirect\n)\n",
        )
        .unwrap();

        let manifest = read_manifest(dir.path());
        assert_eq!(manifest.main_module, "example.com/app");
        assert_eq!(manifest.modules.len(), 2);
        assert!(manifest.modules.is_direct("a.io/x"));
        assert!(!manifest.modules.is_direct("b.io/y"));
    }
}
