// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical conformance verdicts.
//!
//! Test case identifiers are slash-separated paths such as `SHARAN/1`. Every
//! prefix ending before a slash is a group, and the empty string is the root
//! group. A group passes iff every recorded case below it passed.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Verdicts for recorded test cases and every group above them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Conformance {
    verdicts: BTreeMap<String, bool>,
    leaves: BTreeSet<String>,
}

impl Conformance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test case verdict and fold it into every ancestor group.
    ///
    /// Recording the same identifier twice keeps the conjunction of both.
    pub fn record(&mut self, id: &str, passed: bool) {
        self.leaves.insert(id.to_string());
        self.fold(id, passed);
        for group in groups_of(id) {
            self.fold(group, passed);
        }
    }

    fn fold(&mut self, id: &str, passed: bool) {
        let verdict = self.verdicts.entry(id.to_string()).or_insert(true);
        *verdict = *verdict && passed;
    }

    /// Verdict for a test case or group; true when nothing below it has run.
    pub fn verdict(&self, id: &str) -> bool {
        self.get(id).unwrap_or(true)
    }

    /// Verdict for a test case or group, if anything below it was recorded.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.verdicts.get(id).copied()
    }

    /// Verdict of the root group, i.e. of the whole run.
    pub fn passed(&self) -> bool {
        self.verdict("")
    }

    /// Recorded test cases with their verdicts, sorted by identifier.
    pub fn cases(&self) -> impl Iterator<Item = (&str, bool)> {
        self.leaves.iter().map(|id| (id.as_str(), self.verdict(id)))
    }

    /// Identifiers of failed test cases, sorted.
    pub fn failures(&self) -> Vec<&str> {
        self.cases()
            .filter(|(_, passed)| !passed)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of recorded test cases.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Fold in verdicts gathered separately, e.g. for another test file.
    pub fn merge(&mut self, other: &Conformance) {
        for (id, passed) in &other.verdicts {
            self.fold(id, *passed);
        }
        self.leaves.extend(other.leaves.iter().cloned());
    }
}

/// Ancestor groups of an identifier, from the root down.
fn groups_of(id: &str) -> impl Iterator<Item = &str> {
    let root = (!id.is_empty()).then_some("");
    root.into_iter()
        .chain(id.match_indices('/').map(move |(at, _)| &id[..at]))
}

#[cfg(test)]
#[path = "conformance_tests.rs"]
mod tests;
