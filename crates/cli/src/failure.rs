// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-case failure kinds and process exit codes.

use fonttest_markup::MarkupTree;
use serde::Serialize;
use std::fmt;

/// Exit codes of the `fonttest-check` binary
pub mod exit_codes {
    /// Every test case conformed
    pub const SUCCESS: u8 = 0;
    /// At least one test case failed
    pub const FAILURE: u8 = 1;
    /// The harness itself could not run (bad config, broken suite, missing renderer)
    pub const HARNESS_ERROR: u8 = 2;
}

/// Why a test case failed. These are conformance results, not harness errors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaseFailure {
    /// Renderer exited non-zero or was killed by a signal
    Crash { exit_code: Option<i32>, stderr: String },
    /// Renderer exceeded the time limit
    Timeout { after_secs: f64 },
    /// Renderer output was not valid text, markup or path data
    Decode { reason: String },
    /// Renderer output differs from the expectation beyond tolerance
    Mismatch,
}

impl CaseFailure {
    /// Stand-in for the observed rendering, so reports never deal with absence.
    pub fn placeholder(&self) -> MarkupTree {
        MarkupTree::new("div")
            .with_attribute("class", "observed-failure")
            .with_text(format!("\u{26a0} {}", self))
    }
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseFailure::Crash {
                exit_code: Some(code),
                ..
            } => write!(f, "crashed with exit code {}", code),
            CaseFailure::Crash {
                exit_code: None, ..
            } => write!(f, "killed by a signal"),
            CaseFailure::Timeout { after_secs } => write!(f, "timed out after {}s", after_secs),
            CaseFailure::Decode { reason } => write!(f, "unreadable output: {}", reason),
            CaseFailure::Mismatch => write!(f, "output differs from expectation"),
        }
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
