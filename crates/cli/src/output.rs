// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-case progress lines, verbose diffs and the final summary on stdout.

use std::io::Write;

use fonttest_markup::MarkupTree;
use similar::{ChangeTag, TextDiff};

use crate::engine::CaseOutcome;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Totals printed once every test file has been checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub engine: String,
    pub version: Option<String>,
    pub total: usize,
    pub failed: usize,
    pub passed: bool,
}

/// Writes progress for one run, coloring verdicts on a terminal.
pub struct CaseReporter<W: Write> {
    writer: W,
    color: bool,
    verbose: bool,
}

impl<W: Write> CaseReporter<W> {
    pub fn new(writer: W, color: bool, verbose: bool) -> Self {
        Self {
            writer,
            color,
            verbose,
        }
    }

    fn verdict(&self, passed: bool) -> String {
        let (word, color) = if passed { ("PASS", GREEN) } else { ("FAIL", RED) };
        if self.color {
            format!("{}{}{}", color, word, RESET)
        } else {
            word.to_string()
        }
    }

    /// `PASS <id>` or `FAIL <id> (<reason>)`, plus a diff in verbose mode.
    pub fn case(&mut self, outcome: &CaseOutcome, expected: Option<&MarkupTree>) {
        let verdict = self.verdict(outcome.passed());
        let _ = match outcome.failure {
            None => writeln!(self.writer, "{} {}", verdict, outcome.id),
            Some(ref failure) => writeln!(self.writer, "{} {} ({})", verdict, outcome.id, failure),
        };
        if self.verbose && !outcome.passed() {
            if let Some(expected) = expected {
                self.diff(expected, &outcome.observed);
            }
        }
    }

    /// Line diff of the pretty-printed expected and observed markup.
    pub fn diff(&mut self, expected: &MarkupTree, observed: &MarkupTree) {
        let expected = expected.to_pretty_string();
        let observed = observed.to_pretty_string();
        let diff = TextDiff::from_lines(&expected, &observed);
        for change in diff.iter_all_changes() {
            let (sign, color) = match change.tag() {
                ChangeTag::Delete => ("-", RED),
                ChangeTag::Insert => ("+", GREEN),
                ChangeTag::Equal => (" ", DIM),
            };
            let line = change.value().trim_end_matches('\n');
            let _ = if self.color {
                writeln!(self.writer, "    {}{}{}{}", color, sign, line, RESET)
            } else {
                writeln!(self.writer, "    {}{}", sign, line)
            };
        }
    }

    /// Final `PASS`/`FAIL` line for the whole run.
    pub fn summary(&mut self, summary: &Summary) {
        let verdict = self.verdict(summary.passed);
        let engine = match summary.version {
            Some(ref version) => format!("{} {}", summary.engine, version),
            None => summary.engine.clone(),
        };
        let _ = writeln!(
            self.writer,
            "{} {}: {} test cases, {} failed",
            verdict, engine, summary.total, summary.failed
        );
        let _ = self.writer.flush();
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
