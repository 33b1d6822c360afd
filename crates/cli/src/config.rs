// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness configuration: TOML file values overridden by command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cli::Cli;
use crate::engine::EngineConfig;

/// Default engine name passed to the renderer
pub const DEFAULT_ENGINE: &str = "FreeStack";
/// Default renderer binary
pub const DEFAULT_RENDERER: &str = "build/out/Default/fonttest";
/// Default fonts directory
pub const DEFAULT_FONTS_DIR: &str = "fonts";
/// Default directory scanned for test files
pub const DEFAULT_TESTCASES_DIR: &str = "testcases";
/// Default time limit per renderer invocation
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;
/// Default coordinate tolerance
pub const DEFAULT_MAX_DELTA: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Contents of a harness config file. Every field is optional.
///
/// ```toml
/// engine = "OpenType.js"
/// renderer = "build/out/Default/fonttest"
/// timeout_secs = 10
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    #[serde(default)]
    pub engine: Option<String>,

    /// Renderer binary, relative to the config file
    #[serde(default)]
    pub renderer: Option<PathBuf>,

    /// Fonts directory, relative to the config file
    #[serde(default)]
    pub fonts: Option<PathBuf>,

    /// Test files directory, relative to the config file
    #[serde(default)]
    pub testcases: Option<PathBuf>,

    /// Merged report destination
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// JSON results destination
    #[serde(default)]
    pub results: Option<PathBuf>,

    #[serde(default)]
    pub timeout_secs: Option<f64>,

    #[serde(default)]
    pub max_delta: Option<f64>,

    /// Test files checked concurrently
    #[serde(default)]
    pub jobs: Option<usize>,

    /// Identifier prefix selecting which test cases run
    #[serde(default)]
    pub filter: Option<String>,
}

impl HarnessConfig {
    /// Load a config file, resolving its paths against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: HarnessConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or(Path::new("."));
        for field in [
            &mut config.renderer,
            &mut config.fonts,
            &mut config.testcases,
            &mut config.output,
            &mut config.results,
        ] {
            if let Some(relative) = field.as_mut() {
                if relative.is_relative() {
                    *relative = base.join(&*relative);
                }
            }
        }
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug)]
pub struct Settings {
    pub engine: EngineConfig,
    pub testcases_dir: PathBuf,
    /// Explicit test files; empty means discover them in `testcases_dir`
    pub test_files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub jobs: usize,
    pub verbose: bool,
}

impl Settings {
    /// Load the config file named on the command line, if any, and resolve.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let config = match cli.config {
            Some(ref path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };
        Self::resolve(cli, config)
    }

    /// Merge flags over config values over defaults, then validate.
    pub fn resolve(cli: &Cli, config: HarnessConfig) -> Result<Self, ConfigError> {
        let timeout_secs = cli
            .timeout
            .or(config.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "timeout must be a positive number of seconds, got {}",
                    timeout_secs
                ))
            })?;

        let max_delta = cli.max_delta.or(config.max_delta).unwrap_or(DEFAULT_MAX_DELTA);
        if !max_delta.is_finite() || max_delta < 0.0 {
            return Err(ConfigError::Validation(format!(
                "max delta must be a non-negative number, got {}",
                max_delta
            )));
        }

        let jobs = cli.jobs.or(config.jobs).unwrap_or(1);
        if jobs == 0 {
            return Err(ConfigError::Validation(
                "jobs must be at least 1".to_string(),
            ));
        }

        let engine = EngineConfig {
            engine: cli
                .engine
                .clone()
                .or(config.engine)
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
            renderer: cli
                .renderer
                .clone()
                .or(config.renderer)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RENDERER)),
            fonts_dir: cli
                .fonts
                .clone()
                .or(config.fonts)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONTS_DIR)),
            timeout,
            max_delta,
            filter: cli.filter.clone().or(config.filter),
        };

        Ok(Self {
            engine,
            testcases_dir: cli
                .testcases
                .clone()
                .or(config.testcases)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TESTCASES_DIR)),
            test_files: cli.test_files.clone(),
            output: cli.output.clone().or(config.output),
            results: cli.results.clone().or(config.results),
            jobs,
            verbose: cli.verbose,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
