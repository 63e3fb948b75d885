//! PTY capture through the `exec` command.
// Test module - relaxed lint rules
#![cfg(unix)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use std::process::{Command, Output};

use termtext::model::CaptureResult;
use termtext_fixtures::fixture_path;

fn exec(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_termtext"))
        .arg("exec")
        .args(args)
        .output()
        .expect("failed to execute")
}

/// PTYs are missing in some sandboxes; skip rather than fail there.
fn pty_unavailable(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("PTY support appears unavailable") {
        eprintln!("skipping: {stderr}");
        return true;
    }
    false
}

#[test]
fn captures_shell_output_as_text() {
    let output = exec(&["--", "/bin/sh", "-c", "printf 'step 1\\rstep 2\\n\\033[31mred\\033[0m\\n'"]);
    if pty_unavailable(&output) {
        return;
    }
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "step 2\nred\n");
}

#[test]
fn json_output_describes_the_capture() {
    let output = exec(&["--output", "json", "--", "/bin/sh", "-c", "printf 'hi\\n'"]);
    if pty_unavailable(&output) {
        return;
    }
    let capture: CaptureResult = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(capture.command, "/bin/sh");
    assert!(capture.exit_status.success);
    assert!(capture.output_bytes >= 3);
    assert_eq!(capture.document.lines()[0], "hi");
}

#[test]
fn failing_command_exits_with_process_code() {
    let output = exec(&["--", "/bin/sh", "-c", "exit 3"]);
    if pty_unavailable(&output) {
        return;
    }
    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: E_PROCESS_EXIT"));
}

#[test]
fn deadline_exits_with_timeout_code() {
    let output = exec(&["--timeout-ms", "200", "--", "/bin/sh", "-c", "sleep 5"]);
    if pty_unavailable(&output) {
        return;
    }
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: E_TIMEOUT"));
}

#[test]
fn progress_fixture_collapses_to_final_frame() {
    let Some(fixture) = fixture_path(env!("CARGO_BIN_EXE_termtext"), "termtext-progress") else {
        eprintln!("skipping: termtext-progress not built");
        return;
    };
    let fixture = fixture.to_string_lossy().into_owned();
    let output = exec(&["--", &fixture, "5"]);
    if pty_unavailable(&output) {
        return;
    }
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "fetch 100%\ndone\n");
}

#[test]
fn palette_fixture_renders_colored_html() {
    let Some(fixture) = fixture_path(env!("CARGO_BIN_EXE_termtext"), "termtext-palette") else {
        eprintln!("skipping: termtext-palette not built");
        return;
    };
    let fixture = fixture.to_string_lossy().into_owned();
    let output = exec(&["--output", "html", "--", &fixture]);
    if pty_unavailable(&output) {
        return;
    }
    let html = String::from_utf8_lossy(&output.stdout);
    assert!(html.contains("color:#ff8000"), "{html}");
    assert!(html.contains(">truecolor</span>"), "{html}");
}
