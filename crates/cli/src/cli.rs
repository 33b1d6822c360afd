// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Check a text rendering engine against the fonttest conformance suite
#[derive(Parser, Debug)]
#[command(name = "fonttest-check", version, about, args_override_self = true)]
pub struct Cli {
    /// Test files to check (default: every test file in the testcases directory)
    #[arg(value_name = "TESTFILE")]
    pub test_files: Vec<PathBuf>,

    /// Engine the renderer should use (default: FreeStack)
    #[arg(long, env = "FONTTEST_ENGINE")]
    pub engine: Option<String>,

    /// Renderer binary (default: build/out/Default/fonttest)
    #[arg(long, value_name = "PATH")]
    pub renderer: Option<PathBuf>,

    /// TOML config file
    #[arg(long, value_name = "PATH", env = "FONTTEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory scanned for test files (default: testcases)
    #[arg(long, value_name = "DIR")]
    pub testcases: Option<PathBuf>,

    /// Directory font files are resolved against (default: fonts)
    #[arg(long, value_name = "DIR")]
    pub fonts: Option<PathBuf>,

    /// Write the merged HTML report here
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write machine-readable JSON results here
    #[arg(long, value_name = "PATH")]
    pub results: Option<PathBuf>,

    /// Seconds before a renderer invocation is killed (default: 5)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Largest coordinate difference still considered a match (default: 1.0)
    #[arg(long, value_name = "N")]
    pub max_delta: Option<f64>,

    /// Test files checked concurrently (default: 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Only run test cases whose identifier starts with this prefix
    #[arg(long, value_name = "PREFIX")]
    pub filter: Option<String>,

    /// Print a diff of expected and observed markup for failed cases
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
