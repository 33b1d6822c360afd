// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merged conformance report.
//!
//! The report is one XHTML document holding the body of every checked suite
//! in file order. Suites lay out their own presentation: an element with
//! `class="observed"` and an `ft:id` receives the observed rendering of that
//! case, and an element with `class="conformance"` and an `ft:id` receives
//! `PASS` or `FAIL` for that case or group. Cases without an observed slot
//! get one right after their expected element.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use fonttest_markup::{MarkupTree, Node, SVG_NS, XHTML_NS};

use crate::engine::CheckContext;
use crate::suite::{fonttest_attr, TestSuite, EXPECTED_CLASS, EXPECTED_NO_CRASH_CLASS};

/// Placeholder class filled with observed markup.
pub const OBSERVED_CLASS: &str = "observed";
/// Placeholder class filled with a verdict.
pub const CONFORMANCE_CLASS: &str = "conformance";

/// What the report says about the run as a whole.
#[derive(Clone, Debug)]
pub struct ReportHeader {
    pub engine: String,
    pub version: Option<String>,
    pub generated: DateTime<Utc>,
}

fn verdict_word(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Assemble the merged report for the given suites.
pub fn build_report(header: &ReportHeader, suites: &[TestSuite], results: &CheckContext) -> MarkupTree {
    let mut title = format!("fonttest conformance: {}", header.engine);
    if let Some(ref version) = header.version {
        title = format!("{} ({})", title, version);
    }

    let head = MarkupTree::new("head")
        .with_child(MarkupTree::new("meta").with_attribute("charset", "utf-8"))
        .with_child(MarkupTree::new("title").with_text(title.clone()));

    let mut body = MarkupTree::new("body")
        .with_child(MarkupTree::new("h1").with_text(title))
        .with_child(
            MarkupTree::new("p")
                .with_attribute("class", "generated")
                .with_text(format!(
                    "Generated {}",
                    header.generated.format("%Y-%m-%d %H:%M:%S UTC")
                )),
        )
        .with_child(
            MarkupTree::new("p")
                .with_attribute("class", "overall")
                .with_text(format!(
                    "Overall: {} ({} test cases, {} failed)",
                    verdict_word(results.conformance.passed()),
                    results.conformance.len(),
                    results.conformance.failures().len()
                )),
        );

    for suite in suites {
        body = body.with_child(suite_section(suite, results));
    }

    MarkupTree::new("html")
        .with_attribute("xmlns", XHTML_NS)
        .with_child(head)
        .with_child(body)
}

/// One suite's body content, annotated with the results.
fn suite_section(suite: &TestSuite, results: &CheckContext) -> MarkupTree {
    let content = suite.document.child("body").unwrap_or(&suite.document);
    let slotted: HashSet<String> = suite
        .document
        .descendants()
        .into_iter()
        .filter(|element| element.attribute("class") == Some(OBSERVED_CLASS))
        .filter_map(|element| element.attribute(&fonttest_attr("id")))
        .map(str::to_string)
        .collect();

    let mut section = MarkupTree::new("div")
        .with_attribute("class", "suite")
        .with_child(MarkupTree::new("h2").with_text(suite.name()));
    section.children.extend(content.children.iter().cloned());
    annotate(&mut section, results, &slotted);
    section
}

fn annotate(element: &mut MarkupTree, results: &CheckContext, slotted: &HashSet<String>) {
    let class = element.attribute("class").map(str::to_string);
    let id = element.attribute(&fonttest_attr("id")).map(str::to_string);
    match (class.as_deref(), id) {
        (Some(OBSERVED_CLASS), Some(id)) => {
            if let Some(observed) = results.observed.get(&id) {
                element.children = vec![Node::Element(observed.clone())];
            }
        }
        (Some(CONFORMANCE_CLASS), Some(id)) => {
            if let Some(passed) = results.conformance.get(&id) {
                element.set_text(verdict_word(passed));
            }
        }
        _ => {}
    }
    if element.tag == "svg" {
        element.set_attribute("xmlns", SVG_NS);
    }

    for child in std::mem::take(&mut element.children) {
        let Node::Element(mut child) = child else {
            element.children.push(child);
            continue;
        };
        annotate(&mut child, results, slotted);
        let slot = observed_slot(&child, results, slotted);
        element.children.push(Node::Element(child));
        if let Some(mut slot) = slot {
            annotate(&mut slot, results, slotted);
            element.children.push(Node::Element(slot));
        }
    }
}

/// Observed slot for a case element whose suite does not provide one.
fn observed_slot(
    element: &MarkupTree,
    results: &CheckContext,
    slotted: &HashSet<String>,
) -> Option<MarkupTree> {
    let class = element.attribute("class")?;
    if class != EXPECTED_CLASS && class != EXPECTED_NO_CRASH_CLASS {
        return None;
    }
    let id = element.attribute(&fonttest_attr("id"))?;
    if slotted.contains(id) || !results.observed.contains_key(id) {
        return None;
    }
    Some(
        MarkupTree::new("div")
            .with_attribute("class", OBSERVED_CLASS)
            .with_attribute(fonttest_attr("id"), id),
    )
}

/// Write a report as an XHTML file.
pub fn write_report(path: &Path, report: &MarkupTree) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(
        path,
        format!("<!DOCTYPE html>\n{}\n", report.to_markup_string()),
    )
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
