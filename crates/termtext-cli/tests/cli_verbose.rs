//! Tests for the verbosity flag and log output.
// Test module - relaxed lint rules
#![allow(clippy::expect_used)]

use std::io::Write;
use std::process::{Command, Stdio};

fn termtext_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_termtext"));
    command.env_remove("RUST_LOG");
    command
}

fn render_with(args: &[&str], input: &[u8]) -> std::process::Output {
    let mut child = termtext_bin()
        .args(args)
        .arg("render")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input)
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait")
}

#[test]
fn render_accepts_repeated_short_verbose_flag() {
    let output = termtext_bin()
        .args(["-vv", "render", "--help"])
        .output()
        .expect("failed to execute");

    assert!(
        output.status.success(),
        "-vv render --help should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn trace_level_reports_ignored_codes() {
    let output = render_with(&["--color=never", "-vvv"], b"\x1b[55mx\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unsupported SGR code"),
        "stderr should carry the trace event: {stderr}"
    );
}

#[test]
fn default_level_keeps_stderr_quiet() {
    let output = render_with(&["--color=never"], b"\x1b[55mx\n");
    assert!(output.status.success());
    assert!(
        output.stderr.is_empty(),
        "stderr should be empty: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "x\n");
}
