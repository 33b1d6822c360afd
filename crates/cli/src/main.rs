// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fonttest-check binary entry point.

use std::process::ExitCode;

use clap::Parser;

use fonttest_check::cli::Cli;
use fonttest_check::config::Settings;
use fonttest_check::failure::exit_codes;
use fonttest_check::harness::Harness;
use fonttest_check::output_diagnostic::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            print_error(e);
            return ExitCode::from(exit_codes::HARNESS_ERROR);
        }
    };

    match Harness::new(settings).run().await {
        Ok(outcome) if outcome.summary.passed => ExitCode::from(exit_codes::SUCCESS),
        Ok(_) => ExitCode::from(exit_codes::FAILURE),
        Err(e) => {
            print_error(e);
            ExitCode::from(exit_codes::HARNESS_ERROR)
        }
    }
}
