// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conformance engine: runs each test case through the renderer and judges it.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use fonttest_markup::{is_similar, MarkupTree};
use regex::Regex;

use crate::conformance::Conformance;
use crate::failure::CaseFailure;
use crate::process::{run_bounded, CommandLine, ProcessResult, RunError};
use crate::suite::{Expectation, TestCase, TestSuite};

/// Prefix given to identifiers in observed markup before it is merged into a report.
pub const OBSERVED_ID_PREFIX: &str = "OBSERVED-";

/// Default namespace declaration renderers put on their root `<svg>`.
const SVG_NAMESPACE_DECLARATION: &str = r#"xmlns="http://www.w3.org/2000/svg""#;

/// Whitespace between two tags.
static INTER_TAG_WHITESPACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r">\s+<").ok());

/// Renderer invocation settings shared by every test case.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Engine name passed through `--engine`
    pub engine: String,
    /// Renderer binary
    pub renderer: PathBuf,
    /// Directory font file names are resolved against
    pub fonts_dir: PathBuf,
    /// Time limit per renderer invocation
    pub timeout: Duration,
    /// Largest coordinate difference still considered a match
    pub max_delta: f64,
    /// Only run test cases whose identifier starts with this prefix
    pub filter: Option<String>,
}

/// Verdict for one test case along with what the renderer produced.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseOutcome {
    pub id: String,
    pub failure: Option<CaseFailure>,
    /// Parsed renderer output, or a placeholder when there was none to parse
    pub observed: MarkupTree,
}

impl CaseOutcome {
    fn pass(id: &str, observed: MarkupTree) -> Self {
        Self {
            id: id.to_string(),
            failure: None,
            observed,
        }
    }

    /// Failed before there was anything to show; observed is a placeholder.
    fn fail(id: &str, failure: CaseFailure) -> Self {
        Self {
            id: id.to_string(),
            observed: failure.placeholder(),
            failure: Some(failure),
        }
    }

    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Everything a run has learned so far. Each test file can own one and the
/// results merged afterwards.
#[derive(Clone, Debug, Default)]
pub struct CheckContext {
    pub conformance: Conformance,
    /// Observed markup per test case, identifiers already prefixed
    pub observed: BTreeMap<String, MarkupTree>,
    pub failures: BTreeMap<String, CaseFailure>,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome, keeping its observed markup ready for presentation.
    pub fn record(&mut self, outcome: CaseOutcome) {
        self.conformance.record(&outcome.id, outcome.passed());
        let mut observed = outcome.observed;
        observed.prefix_ids(OBSERVED_ID_PREFIX);
        self.observed.insert(outcome.id.clone(), observed);
        if let Some(failure) = outcome.failure {
            self.failures.insert(outcome.id, failure);
        }
    }

    /// Fold in the results of another context.
    pub fn merge(&mut self, other: CheckContext) {
        self.conformance.merge(&other.conformance);
        self.observed.extend(other.observed);
        self.failures.extend(other.failures);
    }
}

/// Collapse whitespace between tags and drop the redundant SVG namespace declaration.
pub fn normalize_observed(text: &str) -> String {
    let collapsed = match INTER_TAG_WHITESPACE.as_ref() {
        Some(re) => re.replace_all(text, "><").into_owned(),
        None => text.to_string(),
    };
    collapsed.replace(SVG_NAMESPACE_DECLARATION, "")
}

/// Runs test cases against one renderer.
#[derive(Clone, Debug)]
pub struct ConformanceEngine {
    config: EngineConfig,
}

impl ConformanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the identifier filter admits this case.
    pub fn selects(&self, case: &TestCase) -> bool {
        self.config
            .filter
            .as_ref()
            .is_none_or(|prefix| case.id.starts_with(prefix.as_str()))
    }

    /// Renderer command line for a test case.
    pub fn command_for(&self, case: &TestCase) -> CommandLine {
        let font = self.config.fonts_dir.join(&case.font);
        let mut command = CommandLine::new(&self.config.renderer)
            .arg(format!("--font={}", font.display()))
            .arg(format!("--testcase={}", case.id))
            .arg(format!("--engine={}", self.config.engine));
        if let Some(ref render) = case.render {
            command = command.arg(format!("--render={}", render));
        }
        if let Some(ref variation) = case.variation {
            command = command.arg(format!("--variation={}", variation));
        }
        command
    }

    /// Run and judge a single test case.
    ///
    /// Renderer misbehavior is a failed verdict; only a renderer that cannot
    /// be started at all is an error.
    pub async fn check_case(&self, case: &TestCase) -> Result<CaseOutcome, RunError> {
        let result = run_bounded(&self.command_for(case), self.config.timeout).await?;
        Ok(self.judge(case, &result))
    }

    fn judge(&self, case: &TestCase, result: &ProcessResult) -> CaseOutcome {
        let id = case.id.as_str();
        if result.timed_out {
            let after_secs = self.config.timeout.as_secs_f64();
            return CaseOutcome::fail(id, CaseFailure::Timeout { after_secs });
        }
        if !result.success() {
            return CaseOutcome::fail(
                id,
                CaseFailure::Crash {
                    exit_code: result.exit_code,
                    stderr: result.stderr_lossy(),
                },
            );
        }

        match (&case.expectation, parse_observed(result)) {
            (Expectation::NoCrash, Ok(observed)) => CaseOutcome::pass(id, observed),
            (Expectation::NoCrash, Err(_)) => CaseOutcome::pass(
                id,
                MarkupTree::new("div")
                    .with_attribute("class", "observed-no-crash")
                    .with_text("rendered without crashing"),
            ),
            (Expectation::Render(_), Err(failure)) => CaseOutcome::fail(id, failure),
            (Expectation::Render(expected), Ok(observed)) => {
                match is_similar(Some(expected), Some(&observed), self.config.max_delta) {
                    Ok(true) => CaseOutcome::pass(id, observed),
                    Ok(false) => CaseOutcome {
                        id: id.to_string(),
                        failure: Some(CaseFailure::Mismatch),
                        observed,
                    },
                    Err(e) => CaseOutcome::fail(
                        id,
                        CaseFailure::Decode {
                            reason: e.to_string(),
                        },
                    ),
                }
            }
        }
    }

    /// Check every selected case of a suite in order, recording into `ctx`.
    ///
    /// `on_case` sees each outcome as soon as it is known.
    pub async fn check_suite<F>(
        &self,
        suite: &TestSuite,
        ctx: &mut CheckContext,
        mut on_case: F,
    ) -> Result<(), RunError>
    where
        F: FnMut(&TestCase, &CaseOutcome),
    {
        for case in suite.cases.iter().filter(|case| self.selects(case)) {
            let outcome = self.check_case(case).await?;
            on_case(case, &outcome);
            ctx.record(outcome);
        }
        Ok(())
    }

    /// Version string reported by `<renderer> --version --engine=<name>`.
    pub async fn renderer_version(&self) -> Option<String> {
        let command = CommandLine::new(&self.config.renderer)
            .arg("--version")
            .arg(format!("--engine={}", self.config.engine));
        let result = run_bounded(&command, self.config.timeout).await.ok()?;
        if !result.success() {
            return None;
        }
        let line = result.stdout_text().ok()?.lines().next()?.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

fn parse_observed(result: &ProcessResult) -> Result<MarkupTree, CaseFailure> {
    let decode = |reason: String| CaseFailure::Decode { reason };
    let text = result.stdout_text().map_err(|e| decode(e.to_string()))?;
    MarkupTree::parse(&normalize_observed(text)).map_err(|e| decode(e.to_string()))
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
