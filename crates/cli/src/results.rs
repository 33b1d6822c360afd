// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Machine-readable run results.

use serde::Serialize;
use std::io;
use std::path::Path;

use crate::engine::CheckContext;
use crate::failure::CaseFailure;

/// Verdict of one test case.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseResult {
    pub id: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CaseFailure>,
}

/// Everything a CI job needs to know about a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunResults {
    pub engine: String,
    pub version: Option<String>,
    pub passed: bool,
    /// Sorted by identifier
    pub cases: Vec<CaseResult>,
}

impl RunResults {
    pub fn new(engine: &str, version: Option<&str>, results: &CheckContext) -> Self {
        let cases = results
            .conformance
            .cases()
            .map(|(id, passed)| CaseResult {
                id: id.to_string(),
                passed,
                failure: results.failures.get(id).cloned(),
            })
            .collect();
        Self {
            engine: engine.to_string(),
            version: version.map(str::to_string),
            passed: results.conformance.passed(),
            cases,
        }
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json + "\n")
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
