//! Import extraction for Go source files using tree-sitter.
//!
//! Only the file header (package clause and import declarations) is ever
//! handed to the parser. The header boundary is found by a small lexer that
//! stops at the first top-level `func`, `type`, `var` or `const`, so the
//! cost of a file does not depend on the size of its body.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Errors that can occur while reading a file's imports.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse imports: {path}")]
    ParseError { path: String },

    #[error("Missing package clause: {path}")]
    MissingPackage { path: String },

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for scanning operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// What a Go file header declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImports {
    /// Name from the `package` clause.
    pub package: String,
    /// Import paths in declaration order, quotes removed.
    pub imports: Vec<String>,
}

/// Parser for Go file headers.
pub struct ImportParser {
    parser: Parser,
}

impl ImportParser {
    /// Create a new ImportParser.
    pub fn new() -> ScanResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|_| ScanError::LanguageInit)?;
        Ok(Self { parser })
    }

    /// Read a file and extract its package name and imports.
    pub fn parse_file(&mut self, path: &Path) -> ScanResult<FileImports> {
        let content = fs::read_to_string(path)?;
        self.parse_source(&content, path)
    }

    /// Extract the package name and imports from source text.
    pub fn parse_source(&mut self, source: &str, path: &Path) -> ScanResult<FileImports> {
        let header = &source[..header_len(source)];

        let tree = self
            .parser
            .parse(header, None)
            .ok_or_else(|| ScanError::ParseError {
                path: path.display().to_string(),
            })?;

        if tree.root_node().has_error() {
            return Err(ScanError::ParseError {
                path: path.display().to_string(),
            });
        }

        let (package, imports) = extract_header(&tree, header);
        let package = package.ok_or_else(|| ScanError::MissingPackage {
            path: path.display().to_string(),
        })?;

        Ok(FileImports { package, imports })
    }
}

/// Walk the top-level nodes of a parsed header.
fn extract_header(tree: &Tree, source: &str) -> (Option<String>, Vec<String>) {
    let root = tree.root_node();
    let mut package = None;
    let mut imports = Vec::new();
    let mut cursor = root.walk();

    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_clause" => {
                let mut inner = child.walk();
                package = child
                    .named_children(&mut inner)
                    .find(|n| n.kind() == "package_identifier")
                    .and_then(|n| node_text(&n, source))
                    .map(str::to_string);
            }
            "import_declaration" => collect_specs(&child, source, &mut imports),
            _ => {}
        }
    }

    (package, imports)
}

/// Collect `import_spec` paths from a declaration, grouped or not.
fn collect_specs(node: &Node, source: &str, imports: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(path) = child
                    .child_by_field_name("path")
                    .and_then(|p| node_text(&p, source))
                    .and_then(unquote)
                {
                    imports.push(path);
                }
            }
            "import_spec_list" => collect_specs(&child, source, imports),
            _ => {}
        }
    }
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Strip the quotes from an interpreted or raw string literal.
fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return Some(raw.to_string());
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            value.push(chars.next()?);
        } else {
            value.push(c);
        }
    }
    Some(value)
}

/// Byte length of the file header.
///
/// The header ends at the first `func`, `type`, `var` or `const` keyword
/// that sits outside parentheses, comments and literals. Files without
/// such a keyword are all header.
pub fn header_len(source: &str) -> usize {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut depth = 0usize;
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(len, |p| i + p);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = source[i + 2..].find("*/").map_or(len, |p| i + 2 + p + 2);
            }
            quote @ (b'"' | b'\'') => i = skip_quoted(bytes, i, quote),
            b'`' => {
                i = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == b'`')
                    .map_or(len, |p| i + 1 + p + 1);
            }
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b if is_ident_byte(b) && !b.is_ascii_digit() => {
                let start = i;
                while i < len && is_ident_byte(bytes[i]) {
                    i += 1;
                }
                if depth == 0 && matches!(&source[start..i], "func" | "type" | "var" | "const") {
                    return start;
                }
            }
            _ => i += 1,
        }
    }

    len
}

/// Skip an interpreted string or rune literal starting at `start`.
/// An unterminated literal ends at the line break.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

// Non-ASCII bytes count as identifier bytes so multi-byte characters are
// consumed whole.
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
