//! Parser for Go `go.mod` files.
//!
//! Only the `module`, `go` and `require` directives feed the graph. The
//! remaining directives are checked for shape and otherwise ignored.

use std::fs;
use std::path::Path;

use super::types::{GoMod, Requirement};

/// Errors that can occur during go.mod parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid go.mod syntax.
    #[error("go.mod:{line}: {message}")]
    Syntax { line: usize, message: String },

    /// The file has no `module` directive.
    #[error("Invalid go.mod: missing module directive")]
    MissingModule,
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

const DIRECTIVES: &[&str] = &[
    "module",
    "go",
    "toolchain",
    "godebug",
    "require",
    "replace",
    "exclude",
    "retract",
    "tool",
    "ignore",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Open,
    Close,
}

struct Line<'a> {
    number: usize,
    tokens: Vec<Token>,
    comment: Option<&'a str>,
}

/// Parses a go.mod file from a file path.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use goraph::manifest::go_mod::parse_file;
///
/// let gomod = parse_file(Path::new("go.mod")).unwrap();
/// println!("Module: {:?}", gomod.module);
/// ```
pub fn parse_file(path: &Path) -> ParseResult<GoMod> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses go.mod content from a string.
///
/// # Example
///
/// ```
/// use goraph::manifest::go_mod::parse_str;
///
/// let gomod = parse_str(r#"
/// module example.com/app
///
/// require (
///     github.com/gorilla/websocket v1.5.1
///     golang.org/x/net v0.17.0 // indirect
/// )
/// "#).unwrap();
///
/// assert_eq!(gomod.requires.len(), 2);
/// assert!(gomod.requires[1].indirect);
/// ```
pub fn parse_str(content: &str) -> ParseResult<GoMod> {
    let mut gomod = GoMod::default();
    let mut block: Option<(String, usize)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = lex_line(idx + 1, raw)?;
        if line.tokens.is_empty() {
            continue;
        }

        if let Some((verb, _)) = &block {
            if line.tokens == [Token::Close] {
                block = None;
            } else {
                apply(&mut gomod, verb, &line)?;
            }
            continue;
        }

        let verb = match line.tokens.first() {
            Some(Token::Word(verb)) if DIRECTIVES.contains(&verb.as_str()) => verb.clone(),
            Some(Token::Word(verb)) => {
                return Err(syntax(line.number, format!("unknown directive: {verb}")))
            }
            _ => return Err(syntax(line.number, "expected directive")),
        };

        match &line.tokens[1..] {
            [Token::Open] => block = Some((verb, line.number)),
            [Token::Open, Token::Close] => {}
            rest => {
                let inline = Line {
                    number: line.number,
                    tokens: rest.to_vec(),
                    comment: line.comment,
                };
                apply(&mut gomod, &verb, &inline)?;
            }
        }
    }

    if let Some((verb, number)) = block {
        return Err(syntax(number, format!("unterminated {verb} block")));
    }
    if gomod.module.is_none() {
        return Err(ParseError::MissingModule);
    }
    Ok(gomod)
}

fn apply(gomod: &mut GoMod, verb: &str, line: &Line<'_>) -> ParseResult<()> {
    let words = words(line)?;
    match (verb, words.as_slice()) {
        ("module", [path]) => {
            if gomod.module.is_some() {
                return Err(syntax(line.number, "repeated module statement"));
            }
            gomod.module = Some(path.to_string());
        }
        ("module", _) => return Err(syntax(line.number, "usage: module module/path")),
        ("go", [version]) => gomod.go_version = Some(version.to_string()),
        ("go", _) => return Err(syntax(line.number, "usage: go 1.23")),
        ("require", [path, version]) => {
            gomod
                .requires
                .push(Requirement::new(*path, *version, is_indirect(line.comment)));
        }
        ("require", _) => return Err(syntax(line.number, "usage: require module/path v1.2.3")),
        ("exclude", [_, _]) => {}
        ("exclude", _) => return Err(syntax(line.number, "usage: exclude module/path v1.2.3")),
        ("replace", _) => check_replace(line.number, &words)?,
        (_, []) => return Err(syntax(line.number, format!("usage: {verb} requires arguments"))),
        _ => {}
    }
    Ok(())
}

fn check_replace(number: usize, words: &[&str]) -> ParseResult<()> {
    let arrow = words
        .iter()
        .position(|w| *w == "=>")
        .ok_or_else(|| syntax(number, "replace is missing =>"))?;
    let (old, new) = (&words[..arrow], &words[arrow + 1..]);
    if !(1..=2).contains(&old.len()) || !(1..=2).contains(&new.len()) {
        return Err(syntax(
            number,
            "usage: replace module/path [v1.2.3] => other/module v1.4 or local/dir",
        ));
    }
    Ok(())
}

fn words<'a>(line: &'a Line<'_>) -> ParseResult<Vec<&'a str>> {
    line.tokens
        .iter()
        .map(|t| match t {
            Token::Word(w) => Ok(w.as_str()),
            _ => Err(syntax(line.number, "unexpected parenthesis")),
        })
        .collect()
}

/// A requirement is indirect when its line comment is `indirect`,
/// optionally followed by `;` and further text.
fn is_indirect(comment: Option<&str>) -> bool {
    comment.is_some_and(|c| c == "indirect" || c.starts_with("indirect;"))
}

fn lex_line(number: usize, raw: &str) -> ParseResult<Line<'_>> {
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut chars = raw.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '/' if raw[start..].starts_with("//") => {
                comment = Some(raw[start + 2..].trim());
                break;
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' | '`' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '\\' if c == '"' => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => value.push(ch),
                    }
                }
                if !closed {
                    return Err(syntax(number, "unterminated quoted string"));
                }
                tokens.push(Token::Word(value));
            }
            _ => {
                let mut value = String::new();
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_whitespace()
                        || matches!(ch, '(' | ')' | '"' | '`')
                        || raw[i..].starts_with("//")
                    {
                        break;
                    }
                    value.push(ch);
                    chars.next();
                }
                tokens.push(Token::Word(value));
            }
        }
    }

    Ok(Line {
        number,
        tokens,
        comment,
    })
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}
