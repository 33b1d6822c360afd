// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test suite files.
//!
//! A suite is an XHTML document. Any element with `class="expected"` or
//! `class="expected-no-crash"` declares a test case through attributes in
//! the fonttest namespace (`ft:id`, `ft:font`, optional `ft:render` and
//! `ft:var`). Rendering cases nest their expected `<svg>` as a direct child.

use fonttest_markup::{
    qualified_name, tokenize, MarkupError, MarkupTree, PathParseError, FONTTEST_NS,
    TOLERANT_ATTRIBUTES,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker class of a case with expected output.
pub const EXPECTED_CLASS: &str = "expected";
/// Marker class of a case that only has to render without crashing.
pub const EXPECTED_NO_CRASH_CLASS: &str = "expected-no-crash";

/// File extensions picked up when scanning a testcases directory.
pub const SUITE_EXTENSIONS: &[&str] = &["html", "xhtml", "xml"];

/// Name of an attribute in the fonttest namespace.
pub fn fonttest_attr(local: &str) -> String {
    qualified_name(Some(FONTTEST_NS), local)
}

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("failed to read test file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Markup {
        path: PathBuf,
        #[source]
        source: MarkupError,
    },

    #[error("{path}: test case element is missing the ft:{attribute} attribute")]
    MissingAttribute {
        path: PathBuf,
        attribute: &'static str,
    },

    #[error("{path}: test case {id} has no expected <svg>")]
    MissingExpected { path: PathBuf, id: String },

    #[error("{path}: duplicate test case {id}")]
    DuplicateTestCase { path: PathBuf, id: String },

    #[error("{path}: test case {id} is already defined in {first}")]
    DuplicateAcrossFiles {
        path: PathBuf,
        id: String,
        first: PathBuf,
    },

    #[error("{path}: test case {id} has invalid {attribute} data: {source}")]
    InvalidPathData {
        path: PathBuf,
        id: String,
        attribute: String,
        #[source]
        source: PathParseError,
    },

    #[error("failed to list test files in {path}: {message}")]
    Discover { path: PathBuf, message: String },
}

/// What a test case expects from the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Expectation {
    /// Output must match this tree within tolerance
    Render(MarkupTree),
    /// Renderer must merely exit successfully
    NoCrash,
}

/// One renderer invocation with its expected outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    pub id: String,
    /// Font file name, relative to the fonts directory
    pub font: String,
    pub render: Option<String>,
    pub variation: Option<String>,
    pub expectation: Expectation,
}

/// A parsed suite file.
#[derive(Clone, Debug)]
pub struct TestSuite {
    pub path: PathBuf,
    /// Full document, kept for the merged report
    pub document: MarkupTree,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// Read and parse a suite file.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let source = std::fs::read_to_string(path).map_err(|source| SuiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &source)
    }

    /// Parse suite markup; `path` is used for error messages and reports.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self, SuiteError> {
        let path = path.into();
        let document = MarkupTree::parse(source).map_err(|source| SuiteError::Markup {
            path: path.clone(),
            source,
        })?;

        let mut cases = Vec::new();
        let mut seen = HashSet::new();
        for element in document.descendants() {
            let Some(case) = parse_case(&path, element)? else {
                continue;
            };
            if !seen.insert(case.id.clone()) {
                return Err(SuiteError::DuplicateTestCase { path, id: case.id });
            }
            cases.push(case);
        }

        Ok(Self {
            path,
            document,
            cases,
        })
    }

    /// File name used to label this suite.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn parse_case(path: &Path, element: &MarkupTree) -> Result<Option<TestCase>, SuiteError> {
    let no_crash = match element.attribute("class") {
        Some(EXPECTED_CLASS) => false,
        Some(EXPECTED_NO_CRASH_CLASS) => true,
        _ => return Ok(None),
    };
    let required = |attribute: &'static str| {
        element
            .attribute(&fonttest_attr(attribute))
            .map(str::to_string)
            .ok_or_else(|| SuiteError::MissingAttribute {
                path: path.to_path_buf(),
                attribute,
            })
    };
    let id = required("id")?;
    let font = required("font")?;
    let render = element.attribute(&fonttest_attr("render")).map(str::to_string);
    let variation = element.attribute(&fonttest_attr("var")).map(str::to_string);

    let expectation = if no_crash {
        Expectation::NoCrash
    } else {
        let svg = element
            .child("svg")
            .cloned()
            .ok_or_else(|| SuiteError::MissingExpected {
                path: path.to_path_buf(),
                id: id.clone(),
            })?;
        validate_path_data(path, &id, &svg)?;
        Expectation::Render(svg)
    };

    Ok(Some(TestCase {
        id,
        font,
        render,
        variation,
        expectation,
    }))
}

/// Expected trees are authored by hand; reject path data the comparator cannot read.
fn validate_path_data(path: &Path, id: &str, svg: &MarkupTree) -> Result<(), SuiteError> {
    for element in svg.descendants() {
        for attribute in TOLERANT_ATTRIBUTES {
            let Some(value) = element.attribute(attribute) else {
                continue;
            };
            if let Err(source) = tokenize(value).collect_all() {
                return Err(SuiteError::InvalidPathData {
                    path: path.to_path_buf(),
                    id: id.to_string(),
                    attribute: attribute.to_string(),
                    source,
                });
            }
        }
    }
    Ok(())
}

/// Suite files directly inside `dir`, sorted by path.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, SuiteError> {
    let discover_error = |message: String| SuiteError::Discover {
        path: dir.to_path_buf(),
        message,
    };
    if !dir.is_dir() {
        return Err(discover_error("not a directory".to_string()));
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for extension in SUITE_EXTENSIONS {
        let pattern = format!("{}/*.{}", escaped, extension);
        let entries = glob::glob(&pattern).map_err(|e| discover_error(e.to_string()))?;
        for entry in entries {
            let file = entry.map_err(|e| discover_error(e.to_string()))?;
            if file.is_file() {
                files.push(file);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
