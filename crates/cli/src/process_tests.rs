// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use std::time::Instant as StdInstant;

fn sh(script: &str) -> CommandLine {
    CommandLine::new("/bin/sh").arg("-c").arg(script)
}

#[test]
fn test_command_line_display() {
    let command = CommandLine::new("/opt/fonttest")
        .arg("--font=fonts/A.ttf")
        .arg("--testcase=A-1");
    assert_eq!(
        command.to_string(),
        "/opt/fonttest --font=fonts/A.ttf --testcase=A-1"
    );
}

#[test]
fn test_success_requires_zero_exit_without_timeout() {
    let mut result = ProcessResult {
        exit_code: Some(0),
        ..Default::default()
    };
    assert!(result.success());
    result.timed_out = true;
    assert!(!result.success());
    result.timed_out = false;
    result.exit_code = None;
    assert!(!result.success());
}

#[test]
fn test_stdout_text_rejects_invalid_utf8() {
    let result = ProcessResult {
        stdout: vec![b'<', 0xff, b'>'],
        ..Default::default()
    };
    let err = result.stdout_text().unwrap_err();
    assert!(err.to_string().contains("not valid UTF-8"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_captures_output_and_exit_code() {
    let result = run_bounded(&sh("printf '<svg/>'; printf oops >&2; exit 3"), Duration::from_secs(10))
        .await
        .unwrap();
    assert!(!result.timed_out);
    assert_eq!(result.exit_code, Some(3));
    assert_eq!(result.stdout, b"<svg/>");
    assert_eq!(result.stderr_lossy(), "oops");
    assert!(!result.success());
}

#[cfg(unix)]
#[tokio::test]
async fn test_fast_child_is_not_killed() {
    let result = run_bounded(&sh("echo done"), Duration::from_secs(10)).await.unwrap();
    assert!(result.success());
    assert_eq!(result.stdout_text().unwrap(), "done\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout_kills_and_reaps_child() {
    let started = StdInstant::now();
    let result = run_bounded(&CommandLine::new("sleep").arg("30"), Duration::from_millis(200))
        .await
        .unwrap();

    assert!(result.timed_out);
    assert!(!result.success());
    assert_eq!(result.exit_code, None);
    assert!(started.elapsed() < Duration::from_secs(5));

    #[cfg(target_os = "linux")]
    {
        let pid = result.pid.unwrap();
        assert!(
            !std::path::Path::new(&format!("/proc/{}", pid)).exists(),
            "child {} still present after timeout",
            pid
        );
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout_kills_grandchildren_holding_pipes() {
    let started = StdInstant::now();
    let result = run_bounded(&sh("sleep 30 & sleep 30; wait"), Duration::from_millis(200))
        .await
        .unwrap();
    assert!(result.timed_out);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[tokio::test]
async fn test_lingering_background_process_does_not_block() {
    let started = StdInstant::now();
    let result = run_bounded(&sh("printf ok; sleep 30 &"), Duration::from_secs(10))
        .await
        .unwrap();
    assert!(!result.timed_out);
    assert_eq!(result.exit_code, Some(0));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let err = run_bounded(
        &CommandLine::new("/nonexistent/fonttest-renderer"),
        Duration::from_secs(1),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RunError::Spawn { .. }));
    assert!(err.to_string().contains("/nonexistent/fonttest-renderer"));
}
