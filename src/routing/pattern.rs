//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Define the pattern-compiler capability consumed by the executor
//! - Provide the default regex-backed compiler
//! - Extract named parameters from matched paths
//!
//! # Syntax
//! - `/users` literal text (regex metacharacters are escaped)
//! - `/users/:id` named parameter, one non-empty segment
//! - `/files/*path` wildcard, one or more characters including `/`
//! - `/users{/:id}` optional group (groups may nest)
//! - `\(` escapes the next character
//!
//! # Design Decisions
//! - Patterns are anchored at both ends
//! - `( ) [ ] ? + !` are reserved and rejected rather than passed to the regex engine
//! - Case-insensitive and trailing-slash tolerant by default

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a pattern string cannot be compiled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid pattern {pattern:?} at index {index}: {reason}")]
pub struct PatternError {
    /// The offending pattern.
    pub pattern: String,
    /// Byte offset of the problem.
    pub index: usize,
    /// Human readable reason.
    pub reason: String,
}

impl PatternError {
    fn new(pattern: &str, index: usize, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            index,
            reason: reason.into(),
        }
    }
}

/// Result of a successful path match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
    /// The matched portion of the path.
    pub path: String,
    /// Captured parameters, in pattern order.
    pub params: Vec<(String, String)>,
}

impl PathMatch {
    /// Look up a captured parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A compiled pattern able to test concrete paths.
pub trait PathMatcher: Send + Sync + fmt::Debug {
    /// Returns the match if `path` satisfies this pattern.
    fn match_path(&self, path: &str) -> Option<PathMatch>;
}

/// Capability that turns pattern strings into matchers.
pub trait PatternCompiler: Send + Sync + 'static {
    /// Compile `pattern` into a matcher.
    fn compile(&self, pattern: &str) -> Result<Arc<dyn PathMatcher>, PatternError>;
}

/// Options applied by [`RegexCompiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternOptions {
    /// Match literal text case-sensitively.
    pub case_sensitive: bool,

    /// Reject a trailing `/` the pattern does not spell out.
    pub strict: bool,

    /// Percent-decode captured parameter values.
    pub decode: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            strict: false,
            decode: true,
        }
    }
}

/// A pattern compiled to an anchored regular expression.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    keys: Vec<String>,
    decode: bool,
}

impl PathPattern {
    /// Compile a pattern with the given options.
    pub fn new(pattern: &str, options: PatternOptions) -> Result<Self, PatternError> {
        let mut source = String::with_capacity(pattern.len() * 2 + 16);
        if !options.case_sensitive {
            source.push_str("(?i)");
        }
        source.push('^');

        let mut keys = Vec::new();
        let mut depth = 0usize;
        let mut chars = pattern.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            match ch {
                ':' | '*' => {
                    let mut name = String::new();
                    while let Some(&(_, next)) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            name.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return Err(PatternError::new(
                            pattern,
                            index,
                            format!("Missing parameter name after {ch:?}"),
                        ));
                    }
                    source.push_str(if ch == ':' { "([^/]+?)" } else { "(.+?)" });
                    keys.push(name);
                }
                '{' => {
                    depth += 1;
                    source.push_str("(?:");
                }
                '}' => {
                    if depth == 0 {
                        return Err(PatternError::new(pattern, index, "Unexpected '}'"));
                    }
                    depth -= 1;
                    source.push_str(")?");
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => push_literal(&mut source, escaped),
                    None => {
                        return Err(PatternError::new(pattern, index, "Trailing escape character"));
                    }
                },
                '(' | ')' | '[' | ']' | '?' | '+' | '!' => {
                    return Err(PatternError::new(
                        pattern,
                        index,
                        format!("Unexpected {ch:?}, escape it with '\\'"),
                    ));
                }
                other => push_literal(&mut source, other),
            }
        }

        if depth > 0 {
            return Err(PatternError::new(pattern, pattern.len(), "Unterminated group"));
        }

        if !options.strict {
            source.push_str("(?:/)?");
        }
        source.push('$');

        let regex = Regex::new(&source)
            .map_err(|e| PatternError::new(pattern, 0, e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            keys,
            decode: options.decode,
        })
    }

    /// The pattern text this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the parameters declared by the pattern.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn decode_value(&self, raw: &str) -> String {
        if !self.decode {
            return raw.to_string();
        }
        urlencoding::decode(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string())
    }
}

impl PathMatcher for PathPattern {
    fn match_path(&self, path: &str) -> Option<PathMatch> {
        let captures = self.regex.captures(path)?;
        let params = self
            .keys
            .iter()
            .enumerate()
            .filter_map(|(i, key)| {
                captures
                    .get(i + 1)
                    .map(|m| (key.clone(), self.decode_value(m.as_str())))
            })
            .collect();

        Some(PathMatch {
            path: captures
                .get(0)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            params,
        })
    }
}

fn push_literal(source: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    source.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}

/// Default compiler: path templates to anchored regexes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler {
    options: PatternOptions,
}

impl RegexCompiler {
    /// Create a compiler with the given options.
    pub fn new(options: PatternOptions) -> Self {
        Self { options }
    }

    /// The options patterns are compiled with.
    pub fn options(&self) -> PatternOptions {
        self.options
    }
}

impl PatternCompiler for RegexCompiler {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn PathMatcher>, PatternError> {
        Ok(Arc::new(PathPattern::new(pattern, self.options)?))
    }
}
