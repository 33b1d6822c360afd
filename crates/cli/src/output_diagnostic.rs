// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness diagnostics on stderr: configuration problems, broken suites,
//! unreachable renderers and unwritable reports.
//!
//! Colored only when stderr is a terminal.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// The run cannot continue
    Error,
    /// The run continues with reduced information
    Warning,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warning => "\x1b[33m",
        }
    }
}

/// Print an error message to stderr.
pub fn print_error(msg: impl Display) {
    print_diagnostic(Level::Error, msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: impl Display) {
    print_diagnostic(Level::Warning, msg);
}

fn print_diagnostic(level: Level, msg: impl Display) {
    let is_tty = io::stderr().is_terminal();
    write_diagnostic(&mut io::stderr(), level, msg, is_tty);
}

/// Write a diagnostic to a writer with explicit terminal flag.
fn write_diagnostic<W: Write>(writer: &mut W, level: Level, msg: impl Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "{}{}: {}\x1b[0m", level.color(), level.label(), msg);
    } else {
        let _ = writeln!(writer, "{}: {}", level.label(), msg);
    }
}

#[cfg(test)]
#[path = "output_diagnostic_tests.rs"]
mod tests;
