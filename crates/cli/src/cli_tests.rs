// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use clap::CommandFactory;

#[test]
fn test_command_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_without_arguments() {
    let cli = Cli::try_parse_from(["fonttest-check", "--engine", "FreeStack"]).unwrap();
    assert!(cli.test_files.is_empty());
    assert_eq!(cli.engine.as_deref(), Some("FreeStack"));
    assert_eq!(cli.timeout, None);
    assert!(!cli.verbose);
}

#[test]
fn test_parse_test_files() {
    let cli = Cli::try_parse_from([
        "fonttest-check",
        "--engine",
        "OpenType.js",
        "testcases/SHARAN.html",
        "testcases/GVAR.html",
    ])
    .unwrap();
    assert_eq!(
        cli.test_files,
        [
            PathBuf::from("testcases/SHARAN.html"),
            PathBuf::from("testcases/GVAR.html")
        ]
    );
}

#[test]
fn test_parse_all_options() {
    let cli = Cli::try_parse_from([
        "fonttest-check",
        "--engine",
        "CoreText",
        "--renderer",
        "/opt/fonttest",
        "--config",
        "fonttest.toml",
        "--testcases",
        "cases",
        "--fonts",
        "fonts",
        "--output",
        "report.html",
        "--results",
        "results.json",
        "--timeout",
        "2.5",
        "--max-delta",
        "0.5",
        "-j",
        "4",
        "--filter",
        "SHARAN/",
        "-v",
    ])
    .unwrap();
    assert_eq!(cli.engine.as_deref(), Some("CoreText"));
    assert_eq!(cli.renderer, Some(PathBuf::from("/opt/fonttest")));
    assert_eq!(cli.config, Some(PathBuf::from("fonttest.toml")));
    assert_eq!(cli.testcases, Some(PathBuf::from("cases")));
    assert_eq!(cli.output, Some(PathBuf::from("report.html")));
    assert_eq!(cli.results, Some(PathBuf::from("results.json")));
    assert_eq!(cli.timeout, Some(2.5));
    assert_eq!(cli.max_delta, Some(0.5));
    assert_eq!(cli.jobs, Some(4));
    assert_eq!(cli.filter.as_deref(), Some("SHARAN/"));
    assert!(cli.verbose);
}

#[test]
fn test_rejects_non_numeric_timeout() {
    assert!(Cli::try_parse_from(["fonttest-check", "--timeout", "soon"]).is_err());
}

#[test]
fn test_last_occurrence_wins() {
    let cli = Cli::try_parse_from([
        "fonttest-check",
        "--renderer",
        "/first",
        "--renderer",
        "/second",
    ])
    .unwrap();
    assert_eq!(cli.renderer, Some(PathBuf::from("/second")));
}
