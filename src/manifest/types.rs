//! Shared types for manifest parsing.
//!
//! This module defines the parsed form of a `go.mod` file and the
//! normalized module set the resolver works against.

use std::collections::HashMap;
use std::fmt;

/// Represents the parts of a `go.mod` file that matter for graph building.
///
/// # Example
///
/// ```
/// use goraph::manifest::go_mod::parse_str;
///
/// let gomod = parse_str("module example.com/app\n\ngo 1.22\n").unwrap();
/// assert_eq!(gomod.module.as_deref(), Some("example.com/app"));
/// assert_eq!(gomod.go_version.as_deref(), Some("1.22"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoMod {
    /// The module path from the `module` directive.
    pub module: Option<String>,

    /// The language version from the `go` directive.
    pub go_version: Option<String>,

    /// Every `require` entry, in file order.
    pub requires: Vec<Requirement>,
}

impl GoMod {
    /// Returns the number of requirements not marked `// indirect`.
    pub fn direct_count(&self) -> usize {
        self.requires.iter().filter(|r| r.is_direct()).count()
    }

    /// Returns the number of requirements marked `// indirect`.
    pub fn indirect_count(&self) -> usize {
        self.requires.iter().filter(|r| r.indirect).count()
    }
}

/// A single `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Module path (e.g., "github.com/gorilla/websocket").
    pub path: String,

    /// Version (e.g., "v1.5.1").
    pub version: String,

    /// Whether the entry carries an `// indirect` comment.
    pub indirect: bool,
}

impl Requirement {
    /// Creates a new Requirement instance.
    pub fn new(path: impl Into<String>, version: impl Into<String>, indirect: bool) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            indirect,
        }
    }

    /// Returns true if the project requires this module itself.
    pub fn is_direct(&self) -> bool {
        !self.indirect
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.indirect {
            write!(f, "{}@{} (indirect)", self.path, self.version)
        } else {
            write!(f, "{}@{}", self.path, self.version)
        }
    }
}

/// A declared dependency as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredModule {
    /// Module path.
    pub path: String,
    /// Direct (`true`) or pulled in transitively (`false`).
    pub direct: bool,
}

/// Declared dependencies in manifest order, with O(1) lookup by path.
///
/// Iteration order is the order of first declaration, which keeps
/// longest-prefix tie breaking and parent selection deterministic.
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    modules: Vec<DeclaredModule>,
    index: HashMap<String, usize>,
}

impl ModuleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from parsed requirements.
    ///
    /// # Example
    ///
    /// ```
    /// use goraph::manifest::{ModuleSet, Requirement};
    ///
    /// let set = ModuleSet::from_requirements(&[
    ///     Requirement::new("a.io/x", "v1.0.0", false),
    ///     Requirement::new("b.io/y", "v0.2.0", true),
    /// ]);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.is_direct("a.io/x"));
    /// assert!(!set.is_direct("b.io/y"));
    /// ```
    pub fn from_requirements(requires: &[Requirement]) -> Self {
        let mut set = Self::new();
        for req in requires {
            set.insert(&req.path, req.is_direct());
        }
        set
    }

    /// Declares a module.
    ///
    /// A repeated path keeps its first position and becomes direct if
    /// any declaration is direct.
    pub fn insert(&mut self, path: &str, direct: bool) {
        if let Some(&idx) = self.index.get(path) {
            self.modules[idx].direct |= direct;
            return;
        }
        self.index.insert(path.to_string(), self.modules.len());
        self.modules.push(DeclaredModule {
            path: path.to_string(),
            direct,
        });
    }

    /// Returns true if `path` is declared.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Returns true if `path` is declared and direct.
    pub fn is_direct(&self, path: &str) -> bool {
        self.get(path).is_some_and(|m| m.direct)
    }

    /// Looks up a declared module by path.
    pub fn get(&self, path: &str) -> Option<&DeclaredModule> {
        self.index.get(path).map(|&idx| &self.modules[idx])
    }

    /// Iterates declared modules in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &DeclaredModule> {
        self.modules.iter()
    }

    /// Iterates declared module paths in manifest order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.path.as_str())
    }

    /// Iterates direct modules in manifest order.
    pub fn direct_modules(&self) -> impl Iterator<Item = &DeclaredModule> {
        self.modules.iter().filter(|m| m.direct)
    }

    /// Number of declared modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Everything the rest of a run needs from the manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// The project's own module path; empty when there is no usable manifest.
    pub main_module: String,
    /// Declared dependencies.
    pub modules: ModuleSet,
}

impl Manifest {
    /// Normalizes a parsed `go.mod`.
    pub fn from_go_mod(gomod: GoMod) -> Self {
        Self {
            modules: ModuleSet::from_requirements(&gomod.requires),
            main_module: gomod.module.unwrap_or_default(),
        }
    }

    /// Returns true if the project has a module identity.
    pub fn has_identity(&self) -> bool {
        !self.main_module.is_empty()
    }
}
