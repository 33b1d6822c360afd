// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One conformance run: discover and load suites, check them, then write
//! the report and results.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::config::{ConfigError, Settings};
use crate::engine::{CaseOutcome, CheckContext, ConformanceEngine};
use crate::output::{CaseReporter, Summary};
use crate::output_diagnostic::print_warning;
use crate::process::RunError;
use crate::report::{build_report, write_report, ReportHeader};
use crate::results::RunResults;
use crate::suite::{discover, Expectation, SuiteError, TestCase, TestSuite};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Suite(#[from] SuiteError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No test files found in {0}")]
    NoTestFiles(PathBuf),

    #[error("Test file task failed: {0}")]
    Task(#[from] JoinError),
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: Summary,
    pub results: CheckContext,
}

type SharedReporter = Arc<Mutex<CaseReporter<Box<dyn io::Write + Send>>>>;

/// Drives a run with resolved settings.
pub struct Harness {
    settings: Settings,
    engine: ConformanceEngine,
}

impl Harness {
    pub fn new(settings: Settings) -> Self {
        let engine = ConformanceEngine::new(settings.engine.clone());
        Self { settings, engine }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Explicit test files, or every suite file in the testcases directory.
    pub fn test_files(&self) -> Result<Vec<PathBuf>, HarnessError> {
        if !self.settings.test_files.is_empty() {
            return Ok(self.settings.test_files.clone());
        }
        let files = discover(&self.settings.testcases_dir)?;
        if files.is_empty() {
            return Err(HarnessError::NoTestFiles(
                self.settings.testcases_dir.clone(),
            ));
        }
        Ok(files)
    }

    /// Load every suite up front so a broken file fails the run before any renderer starts.
    ///
    /// Identifiers must be unique across all loaded files.
    pub fn load_suites(&self) -> Result<Vec<TestSuite>, HarnessError> {
        let mut suites = Vec::new();
        let mut owners: HashMap<String, PathBuf> = HashMap::new();
        for file in self.test_files()? {
            let suite = TestSuite::load(&file)?;
            for case in &suite.cases {
                if let Some(first) = owners.insert(case.id.clone(), suite.path.clone()) {
                    return Err(SuiteError::DuplicateAcrossFiles {
                        path: suite.path.clone(),
                        id: case.id.clone(),
                        first,
                    }
                    .into());
                }
            }
            suites.push(suite);
        }
        Ok(suites)
    }

    /// Check every suite, printing progress to stdout.
    pub async fn run(&self) -> Result<RunOutcome, HarnessError> {
        let color = io::IsTerminal::is_terminal(&io::stdout());
        let writer: Box<dyn io::Write + Send> = Box::new(io::stdout());
        self.run_with(CaseReporter::new(writer, color, self.settings.verbose))
            .await
    }

    /// Check every suite, printing progress through `reporter`.
    pub async fn run_with(
        &self,
        reporter: CaseReporter<Box<dyn io::Write + Send>>,
    ) -> Result<RunOutcome, HarnessError> {
        let suites = self.load_suites()?;
        let selected: usize = suites
            .iter()
            .map(|suite| suite.cases.iter().filter(|case| self.engine.selects(case)).count())
            .sum();
        if selected == 0 {
            print_warning("no test cases selected");
        }

        let version = self.engine.renderer_version().await;
        if version.is_none() {
            print_warning(format_args!(
                "could not determine the version of {}",
                self.settings.engine.renderer.display()
            ));
        }

        let reporter: SharedReporter = Arc::new(Mutex::new(reporter));
        let results = if self.settings.jobs > 1 {
            self.check_concurrently(&suites, &reporter).await?
        } else {
            self.check_sequentially(&suites, &reporter).await?
        };

        let summary = Summary {
            engine: self.settings.engine.engine.clone(),
            version: version.clone(),
            total: results.conformance.len(),
            failed: results.conformance.failures().len(),
            passed: results.conformance.passed(),
        };
        reporter.lock().summary(&summary);

        if let Some(ref path) = self.settings.output {
            let header = ReportHeader {
                engine: summary.engine.clone(),
                version: version.clone(),
                generated: Utc::now(),
            };
            let report = build_report(&header, &suites, &results);
            write_report(path, &report).map_err(|source| HarnessError::Write {
                path: path.clone(),
                source,
            })?;
        }
        if let Some(ref path) = self.settings.results {
            RunResults::new(&summary.engine, version.as_deref(), &results)
                .write(path)
                .map_err(|source| HarnessError::Write {
                    path: path.clone(),
                    source,
                })?;
        }

        Ok(RunOutcome { summary, results })
    }

    async fn check_sequentially(
        &self,
        suites: &[TestSuite],
        reporter: &SharedReporter,
    ) -> Result<CheckContext, HarnessError> {
        let mut results = CheckContext::new();
        for suite in suites {
            self.engine
                .check_suite(suite, &mut results, |case, outcome| {
                    report_case(reporter, case, outcome)
                })
                .await?;
        }
        Ok(results)
    }

    /// One task per test file, at most `jobs` at a time, merged in file order.
    async fn check_concurrently(
        &self,
        suites: &[TestSuite],
        reporter: &SharedReporter,
    ) -> Result<CheckContext, HarnessError> {
        let permits = Arc::new(Semaphore::new(self.settings.jobs));
        let mut tasks = JoinSet::new();
        for (index, suite) in suites.iter().cloned().enumerate() {
            let engine = self.engine.clone();
            let permits = Arc::clone(&permits);
            let reporter = Arc::clone(reporter);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let mut results = CheckContext::new();
                engine
                    .check_suite(&suite, &mut results, |case, outcome| {
                        report_case(&reporter, case, outcome)
                    })
                    .await
                    .map(|()| (index, results))
            });
        }

        let mut per_file: Vec<Option<CheckContext>> = vec![None; suites.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, results) = joined??;
            per_file[index] = Some(results);
        }

        let mut results = CheckContext::new();
        for file_results in per_file.into_iter().flatten() {
            results.merge(file_results);
        }
        Ok(results)
    }
}

fn report_case(reporter: &SharedReporter, case: &TestCase, outcome: &CaseOutcome) {
    let expected = match case.expectation {
        Expectation::Render(ref tree) => Some(tree),
        Expectation::NoCrash => None,
    };
    reporter.lock().case(outcome, expected);
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
