// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer for SVG path data.
//!
//! Splits a `d` attribute (or any whitespace/comma separated number list such
//! as `viewBox`) into drawto commands and numeric literals. Numbers are kept
//! as the source text so that unparsable fragments still compare by string.

use std::fmt;
use thiserror::Error;

const COMMANDS: &[u8] = b"MmZzLlHhVvCcSsQqTtAa";

/// A single lexeme of path data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathToken<'a> {
    /// A drawto command letter such as `M` or `q`.
    Command(char),
    /// A numeric literal exactly as written, e.g. `-1.5e3` or `.3`.
    Number(&'a str),
}

impl PathToken<'_> {
    /// Numeric value of the token, if it is a number that parses.
    ///
    /// Fragments like a lone `-` or `1e` are lexed as numbers but have no value.
    pub fn value(&self) -> Option<f64> {
        match self {
            PathToken::Command(_) => None,
            PathToken::Number(text) => text.parse().ok(),
        }
    }

    /// Whether two tokens agree within `max_delta`.
    ///
    /// Numbers compare by absolute difference (inclusive); everything else
    /// compares by its source text. Literals that overflow to the same
    /// infinity are equal.
    pub fn is_similar(&self, other: &PathToken<'_>, max_delta: f64) -> bool {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => a == b || (a - b).abs() <= max_delta,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for PathToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Command(c) => write!(f, "{}", c),
            PathToken::Number(text) => f.write_str(text),
        }
    }
}

/// Path data contained a character outside the path grammar.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unexpected character {found:?} at offset {offset} in path data")]
pub struct PathParseError {
    /// Byte offset of the offending character.
    pub offset: usize,
    /// The offending character.
    pub found: char,
}

/// Lazily tokenize path data.
pub fn tokenize(data: &str) -> PathTokens<'_> {
    PathTokens {
        data,
        pos: 0,
        start: None,
        is_float: false,
        queued: None,
        done: false,
    }
}

/// Iterator over the tokens of a path string.
///
/// A clone continues independently from the same position; call [`tokenize`]
/// again to start over.
#[derive(Clone, Debug)]
pub struct PathTokens<'a> {
    data: &'a str,
    pos: usize,
    /// Start offset of the number being accumulated.
    start: Option<usize>,
    /// The pending number already contains a decimal point.
    is_float: bool,
    /// Command letter that closed a pending number and still has to be yielded.
    queued: Option<PathToken<'a>>,
    done: bool,
}

impl<'a> PathTokens<'a> {
    /// Collect the remaining tokens, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<PathToken<'a>>, PathParseError> {
        self.collect()
    }

    fn flush(&mut self, end: usize) -> Option<PathToken<'a>> {
        let start = self.start.take()?;
        self.is_float = false;
        Some(PathToken::Number(&self.data[start..end]))
    }
}

impl<'a> Iterator for PathTokens<'a> {
    type Item = Result<PathToken<'a>, PathParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.queued.take() {
            return Some(Ok(token));
        }
        if self.done {
            return None;
        }

        let data = self.data;
        let bytes = data.as_bytes();
        while self.pos < bytes.len() {
            let i = self.pos;
            let c = bytes[i];
            self.pos += 1;

            match c {
                b'0'..=b'9' | b'e' | b'E' => {
                    self.start.get_or_insert(i);
                }
                b',' | b' ' | b'\t' | b'\n' | b'\r' | 0x0c | 0x0b => {
                    if let Some(token) = self.flush(i) {
                        return Some(Ok(token));
                    }
                }
                c if COMMANDS.contains(&c) => {
                    let command = PathToken::Command(c as char);
                    return match self.flush(i) {
                        Some(number) => {
                            self.queued = Some(command);
                            Some(Ok(number))
                        }
                        None => Some(Ok(command)),
                    };
                }
                b'.' => {
                    if self.is_float {
                        // `1.2.3` is `1.2` followed by `.3`
                        if let Some(number) = self.flush(i) {
                            self.start = Some(i);
                            self.is_float = true;
                            return Some(Ok(number));
                        }
                    }
                    self.start.get_or_insert(i);
                    self.is_float = true;
                }
                b'+' | b'-' => {
                    let after_exponent = i > 0 && matches!(bytes[i - 1], b'e' | b'E');
                    if !after_exponent {
                        if let Some(number) = self.flush(i) {
                            self.start = Some(i);
                            return Some(Ok(number));
                        }
                    }
                    self.start.get_or_insert(i);
                }
                _ => {
                    self.done = true;
                    self.start = None;
                    let found = data[i..].chars().next().unwrap_or('\u{fffd}');
                    return Some(Err(PathParseError { offset: i, found }));
                }
            }
        }

        self.done = true;
        self.flush(bytes.len()).map(Ok)
    }
}

impl std::iter::FusedIterator for PathTokens<'_> {}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
