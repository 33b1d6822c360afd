// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Harness errors exit with code 2 and a diagnostic; they never look like
//! a conformance failure.

mod common;

use common::Workspace;
use predicates::prelude::*;

#[test]
fn test_help_lists_options() {
    let ws = Workspace::new();
    ws.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-delta"))
        .stdout(predicate::str::contains("--renderer"));
}

#[test]
fn test_missing_renderer() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1"]);

    ws.command()
        .arg("--renderer")
        .arg(ws.path().join("no-such-renderer"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error: failed to start"))
        .stderr(predicate::str::contains("no-such-renderer"));
}

#[test]
fn test_broken_suite_file() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1"]);
    std::fs::write(ws.testcases().join("B.html"), "<html><body><div></body></html>").unwrap();

    ws.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("B.html"))
        .stderr(predicate::str::contains("malformed markup"));
}

#[test]
fn test_duplicate_test_case() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1", "A/pass1"]);

    ws.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate test case A/pass1"));
}

#[test]
fn test_test_case_shared_between_files() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1"]);
    ws.write_suite("B.html", &["A/pass1"]);

    ws.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("test case A/pass1 is already defined in"));
}

#[test]
fn test_empty_testcases_directory() {
    let ws = Workspace::new();

    ws.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No test files found"));
}

#[test]
fn test_missing_test_file() {
    let ws = Workspace::new();

    ws.command()
        .arg(ws.testcases().join("MISSING.html"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("MISSING.html"));
}

#[test]
fn test_unknown_config_key() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1"]);
    let config = ws.path().join("fonttest.toml");
    std::fs::write(&config, "engine = \"FreeStack\"\ntimeout = 3\n").unwrap();

    ws.command()
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn test_invalid_timeout() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1"]);

    ws.command()
        .args(["--timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout must be a positive number"));
}

#[cfg(unix)]
#[test]
fn test_config_file_supplies_defaults() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/mismatch1"]);
    let config = ws.path().join("fonttest.toml");
    std::fs::write(&config, "engine = \"OpenType.js\"\nmax_delta = 100.0\n").unwrap();

    ws.command()
        .env("FONTTEST_CONFIG", &config)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("PASS OpenType.js"));
}

#[cfg(unix)]
#[test]
fn test_unwritable_report() {
    let ws = Workspace::new();
    ws.write_suite("A.html", &["A/pass1"]);
    std::fs::write(ws.path().join("blocker"), "").unwrap();

    ws.command()
        .args(["--output", "blocker/report.html"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to write"));
}
