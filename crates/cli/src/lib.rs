// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fonttest conformance checker
//!
//! Runs a text rendering engine over a suite of test cases, compares the
//! glyph outlines it draws against hand-curated expectations within a
//! coordinate tolerance, and rolls the verdicts up into group and suite
//! verdicts.
//!
#![doc = include_str!("../docs/USAGE.md")]

// Internal modules - pub for binary access, hidden from docs
#[doc(hidden)]
pub mod cli;
#[doc(hidden)]
pub mod config;
pub mod conformance;
pub mod engine;
pub mod failure;
#[doc(hidden)]
pub mod harness;
#[doc(hidden)]
pub mod output;
#[doc(hidden)]
pub mod output_diagnostic;
pub mod process;
#[doc(hidden)]
pub mod report;
#[doc(hidden)]
pub mod results;
pub mod suite;
