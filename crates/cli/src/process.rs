// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded execution of renderer binaries.
//!
//! Renderers are untrusted: they may hang, crash, spawn helpers or print
//! garbage. [`run_bounded`] races the child's exit against a deadline at a
//! single `select!`, kills the whole process group when the deadline wins,
//! and always reaps the child before returning.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long to wait for output pipes to close once the child has exited.
pub const OUTPUT_GRACE: Duration = Duration::from_millis(500);

/// Program and arguments for one renderer invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument (builder style)
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Outcome of a bounded run. Output is raw bytes; nothing about it is trusted.
#[derive(Clone, Debug, Default)]
pub struct ProcessResult {
    /// Exit code, absent when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// The deadline elapsed and the child was killed.
    pub timed_out: bool,
    pub pid: Option<u32>,
}

impl ProcessResult {
    /// Exited on its own with status zero.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Decode standard output as UTF-8.
    pub fn stdout_text(&self) -> Result<&str, OutputDecodeError> {
        Ok(std::str::from_utf8(&self.stdout)?)
    }

    /// Standard error, lossily decoded for diagnostics only.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Renderer output is not valid text.
#[derive(Debug, Error)]
#[error("output is not valid UTF-8: {0}")]
pub struct OutputDecodeError(#[from] std::str::Utf8Error);

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Run `command` to completion or until `timeout` elapses.
///
/// A child that exits before the deadline is never killed, even when the
/// deadline is reached while its exit is being observed. On timeout the
/// child's process group is killed and the child is reaped before returning.
pub async fn run_bounded(command: &CommandLine, timeout: Duration) -> Result<ProcessResult, RunError> {
    let program = command.program.display().to_string();

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
        program: program.clone(),
        source,
    })?;
    let pid = child.id();
    let stdout = child.stdout.take().map(|pipe| tokio::spawn(read_all(pipe)));
    let stderr = child.stderr.take().map(|pipe| tokio::spawn(read_all(pipe)));

    let deadline = Instant::now() + timeout;
    let (status, timed_out) = tokio::select! {
        biased;
        status = child.wait() => (status, false),
        _ = tokio::time::sleep_until(deadline) => (terminate(&mut child, pid).await, true),
    };
    let status = status.map_err(|source| RunError::Wait { program, source })?;

    let stdout = collect(stdout, pid).await;
    let stderr = collect(stderr, pid).await;

    Ok(ProcessResult {
        exit_code: status.code(),
        stdout,
        stderr,
        timed_out,
        pid,
    })
}

/// Kill the child and everything it started, then reap it.
async fn terminate(child: &mut Child, pid: Option<u32>) -> io::Result<std::process::ExitStatus> {
    if let Some(pid) = pid {
        kill_group(pid);
    }
    // Fails harmlessly if the child exited after the deadline fired.
    let _ = child.start_kill();
    child.wait().await
}

#[cfg(unix)]
fn kill_group(pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Ok(raw) = i32::try_from(pid) {
        // ESRCH just means the group is already gone.
        let _ = killpg(Pid::from_raw(raw), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}

async fn read_all<R: AsyncRead + Unpin>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Wait for a pipe reader, killing leftover descendants that keep it open.
async fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>, pid: Option<u32>) -> Vec<u8> {
    let Some(mut reader) = reader else {
        return Vec::new();
    };
    if let Ok(joined) = tokio::time::timeout(OUTPUT_GRACE, &mut reader).await {
        return joined.ok().and_then(Result::ok).unwrap_or_default();
    }

    if let Some(pid) = pid {
        kill_group(pid);
    }
    match tokio::time::timeout(OUTPUT_GRACE, &mut reader).await {
        Ok(joined) => joined.ok().and_then(Result::ok).unwrap_or_default(),
        Err(_) => {
            reader.abort();
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
