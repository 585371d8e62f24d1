//! Import classification and module resolution.
//!
//! Every import path falls into one of four classes:
//!
//! - **standard library**: the first path segment has no `.`; ignored
//! - **internal**: the path starts with the project's module path
//! - **external**: some declared module is a prefix of the path; the
//!   longest such module owns the import
//! - **unresolved**: external, but no declared module owns it; dropped
//!
//! Matching is textual, as the manifest records module paths and nothing
//! about package boundaries inside them.
//!
//! # Example
//!
//! ```
//! use goraph::manifest::{ModuleSet, Requirement};
//! use goraph::resolver::{classify, ImportClass};
//!
//! let modules = ModuleSet::from_requirements(&[
//!     Requirement::new("a.io/x", "v1.0.0", false),
//!     Requirement::new("a.io/x/y", "v1.0.0", false),
//! ]);
//!
//! assert_eq!(classify("fmt", "example.com/app", &modules), ImportClass::StandardLibrary);
//! assert_eq!(classify("example.com/app/util", "example.com/app", &modules), ImportClass::Internal);
//! assert_eq!(
//!     classify("a.io/x/y/z", "example.com/app", &modules),
//!     ImportClass::External { module: "a.io/x/y" }
//! );
//! assert_eq!(classify("unknown.org/lib", "example.com/app", &modules), ImportClass::Unresolved);
//! ```

use crate::manifest::ModuleSet;

/// Prefix of node ids created for individual import paths.
pub const IMPORT_PREFIX: &str = "import:";

/// Import paths longer than this get an abbreviated label.
pub const DEFAULT_LABEL_MAX_LEN: usize = 40;

/// How an import path relates to the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportClass<'a> {
    /// A language built-in package.
    StandardLibrary,
    /// A package of the project's own module.
    Internal,
    /// A package owned by the declared module `module`.
    External { module: &'a str },
    /// An external package no declared module owns.
    Unresolved,
}

/// Classifies `import_path` against the project's module and declared modules.
pub fn classify<'a>(import_path: &str, main_module: &str, modules: &'a ModuleSet) -> ImportClass<'a> {
    if is_standard_library(import_path) {
        return ImportClass::StandardLibrary;
    }
    if is_internal(import_path, main_module) {
        return ImportClass::Internal;
    }
    match longest_prefix_match(import_path, modules.paths()) {
        Some(module) => ImportClass::External { module },
        None => ImportClass::Unresolved,
    }
}

/// Returns true for imports without a domain-like first segment.
pub fn is_standard_library(import_path: &str) -> bool {
    !first_segment(import_path).contains('.')
}

/// Returns true if `import_path` lies inside `main_module`.
///
/// An empty `main_module` is a prefix of every path: without a module
/// identity every non-stdlib import belongs to the project.
pub fn is_internal(import_path: &str, main_module: &str) -> bool {
    import_path.starts_with(main_module)
}

/// Selects the longest candidate that is a prefix of `import_path`.
///
/// Among equally long matches the first candidate wins.
pub fn longest_prefix_match<'a, I>(import_path: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&'a str> = None;
    for candidate in candidates {
        if candidate.is_empty() || !import_path.starts_with(candidate) {
            continue;
        }
        if best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }
    best
}

/// Picks the probable parent of an indirect module.
///
/// This is a best-effort heuristic: a manifest does not record which direct
/// dependency pulled an indirect one in. The first candidate whose first
/// path segment occurs anywhere in `indirect` is taken.
pub fn likely_parent<'a, I>(indirect: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().find(|candidate| {
        let segment = first_segment(candidate);
        !segment.is_empty() && indirect.contains(segment)
    })
}

/// Node id for an individual import path.
pub fn import_id(import_path: &str) -> String {
    format!("{}{}", IMPORT_PREFIX, import_path)
}

/// The part of `path` before the first `/`.
pub fn first_segment(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

/// The part of `path` after the last `/`.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Display label for an external import path.
///
/// Paths longer than `max_len` bytes with more than two segments are shown
/// as `first/.../last`.
///
/// # Example
///
/// ```
/// use goraph::resolver::import_label;
///
/// assert_eq!(import_label("a.io/x/y", 40), "a.io/x/y");
/// assert_eq!(
///     import_label("github.com/aws/aws-sdk-go-v2/service/s3/types", 40),
///     "github.com/.../types"
/// );
/// ```
pub fn import_label(import_path: &str, max_len: usize) -> String {
    if import_path.len() <= max_len {
        return import_path.to_string();
    }
    let parts: Vec<&str> = import_path.split('/').collect();
    match parts.as_slice() {
        [first, _, .., last] => format!("{}/.../{}", first, last),
        _ => import_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Requirement;

    fn modules(paths: &[(&str, bool)]) -> ModuleSet {
        let reqs: Vec<_> = paths
            .iter()
            .map(|(p, direct)| Requirement::new(*p, "v1.0.0", !direct))
            .collect();
        ModuleSet::from_requirements(&reqs)
    }

    #[test]
    fn test_standard_library() {
        assert!(is_standard_library("fmt"));
        assert!(is_standard_library("net/http"));
        assert!(is_standard_library("golang/x.y"));
        assert!(!is_standard_library("github.com/gorilla/websocket"));
        assert!(!is_standard_library("gopkg.in/yaml.v3"));
    }

    #[test]
    fn test_internal_prefix() {
        assert!(is_internal("example.com/app/util", "example.com/app"));
        assert!(is_internal("example.com/app", "example.com/app"));
        assert!(!is_internal("example.com/other", "example.com/app"));
    }

    #[test]
    fn test_empty_identity_owns_everything() {
        assert!(is_internal("example.com/app/util", ""));
        assert!(is_internal("github.com/a/b", ""));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let set = modules(&[("a.io/x", true), ("a.io/x/y", true)]);
        assert_eq!(longest_prefix_match("a.io/x/y/z", set.paths()), Some("a.io/x/y"));
        assert_eq!(longest_prefix_match("a.io/x/w", set.paths()), Some("a.io/x"));

        // Declaration order does not matter
        let reversed = modules(&[("a.io/x/y", true), ("a.io/x", true)]);
        assert_eq!(longest_prefix_match("a.io/x/y/z", reversed.paths()), Some("a.io/x/y"));
    }

    #[test]
    fn test_longest_prefix_tie_keeps_first() {
        let candidates = ["a.io/xy", "a.io/xy"];
        assert_eq!(
            longest_prefix_match("a.io/xy/z", candidates.iter().copied()),
            Some("a.io/xy")
        );
    }

    #[test]
    fn test_longest_prefix_no_match() {
        let set = modules(&[("a.io/x", true)]);
        assert_eq!(longest_prefix_match("unknown.org/lib/sub", set.paths()), None);
    }

    #[test]
    fn test_classify_stdlib_before_internal() {
        // A module path without a dot cannot own non-stdlib imports
        let set = ModuleSet::new();
        assert_eq!(classify("myapp/util", "myapp", &set), ImportClass::StandardLibrary);
    }

    #[test]
    fn test_classify_no_identity_is_internal() {
        let set = modules(&[("a.io/x", true)]);
        assert_eq!(classify("a.io/x/y", "", &set), ImportClass::Internal);
        assert_eq!(classify("b.io/z", "", &set), ImportClass::Internal);
        assert_eq!(classify("fmt", "", &set), ImportClass::StandardLibrary);
    }

    #[test]
    fn test_likely_parent_matches_first_segment() {
        let parent = likely_parent(
            "golang.org/x/net",
            ["github.com/gorilla/websocket", "golang.org/x/mod"],
        );
        assert_eq!(parent, Some("golang.org/x/mod"));
    }

    #[test]
    fn test_likely_parent_none() {
        let parent = likely_parent("z.io/orphan", ["github.com/gorilla/websocket"]);
        assert_eq!(parent, None);
        assert_eq!(likely_parent("z.io/orphan", Vec::<&str>::new()), None);
    }

    #[test]
    fn test_likely_parent_substring_anywhere() {
        let parent = likely_parent("mirror.example/github.com/pkg", ["github.com/a/b"]);
        assert_eq!(parent, Some("github.com/a/b"));
    }

    #[test]
    fn test_segments() {
        assert_eq!(first_segment("github.com/a/b"), "github.com");
        assert_eq!(first_segment("fmt"), "fmt");
        assert_eq!(base_name("github.com/a/b"), "b");
        assert_eq!(base_name("fmt"), "fmt");
    }

    #[test]
    fn test_import_id() {
        assert_eq!(import_id("a.io/x"), "import:a.io/x");
    }

    #[test]
    fn test_import_label_long_two_segments_kept() {
        let path = "averyveryveryverylongdomainname.example/averyverylongname";
        assert_eq!(import_label(path, 40), path);
    }

    #[test]
    fn test_import_label_threshold() {
        let path = "github.com/abcdefghijklmnopqrs/tuvwxyz12"; // 40 chars
        assert_eq!(path.len(), 40);
        assert_eq!(import_label(path, 40), path);
        assert_eq!(import_label(path, 39), "github.com/.../tuvwxyz12");
    }

    #[test]
    fn test_import_label_counts_bytes() {
        // 38 chars, 40 bytes: "é" is two bytes each
        let path = "github.com/abcdefghijklmnopqé/tuvwxyzé";
        assert_eq!(path.chars().count(), 38);
        assert_eq!(path.len(), 40);
        assert_eq!(import_label(path, 40), path);
        assert_eq!(import_label(path, 39), "github.com/.../tuvwxyzé");
    }
}
