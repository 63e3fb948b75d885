// Test module - relaxed lint rules
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use termtext::sysreq::{
    Architecture, Platform, ReleaseTarget, SystemProfile, ToolVersion, VectorIsa,
};
use termtext_fixtures::{temp_dir, write_json};

fn profile() -> SystemProfile {
    SystemProfile {
        cpu_speed_mhz: 3200,
        memory_bytes: 16 * 1024 * 1024 * 1024,
        free_disk_bytes: Some(100 * 1024 * 1024 * 1024),
        os_version: "5.15.0".to_string(),
        architecture: Architecture::X86_64,
        platform: Platform::Linux,
        vector_isa: VectorIsa::Avx2,
        tool_version: Some(ToolVersion {
            major: 2,
            minor: 90,
        }),
    }
}

fn sysreq(dir: &Path, target: Option<&ReleaseTarget>, extra: &[&str]) -> Output {
    let profile_path = dir.join("profile.json");
    write_json(&profile_path, &profile());
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_termtext"));
    cmd.arg("sysreq").arg("--profile").arg(&profile_path);
    if let Some(target) = target {
        let target_path = dir.join("target.json");
        write_json(&target_path, target);
        cmd.arg("--target").arg(&target_path);
    }
    cmd.args(extra).output().expect("failed to execute")
}

#[test]
fn table_lists_every_requirement() {
    let dir = temp_dir("sysreq-table");
    let output = sysreq(&dir, None, &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    for (line, name) in lines.iter().zip([
        "CPU Speed",
        "Memory",
        "Disk Space",
        "OS",
        "Vector ISA",
        "Tool Version",
    ]) {
        assert!(line.starts_with("ok "), "{line}");
        assert!(line.contains(name), "{line}");
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn matching_target_runs() {
    let dir = temp_dir("sysreq-match");
    let target = ReleaseTarget {
        architecture: Architecture::X86_64,
        platform: Platform::Linux,
        vector_isa: VectorIsa::Avx,
    };
    let output = sysreq(&dir, Some(&target), &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).ends_with("will run: yes\n"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn newer_vector_isa_does_not_run() {
    let dir = temp_dir("sysreq-avx512");
    let target = ReleaseTarget {
        architecture: Architecture::X86_64,
        platform: Platform::Linux,
        vector_isa: VectorIsa::Avx512,
    };
    let output = sysreq(&dir, Some(&target), &["--json"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["will_run"], false);
    assert_eq!(value["rows"].as_array().unwrap().len(), 6);
    assert_eq!(value["rows"][0]["name"], "CPU Speed");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_profile_is_protocol_error() {
    let dir = temp_dir("sysreq-bad");
    let profile_path = dir.join("profile.json");
    fs::write(&profile_path, "{\"cpu_speed_mhz\": \"fast\"}").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_termtext"))
        .args(["sysreq", "--profile"])
        .arg(&profile_path)
        .output()
        .expect("failed to execute");
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: E_PROTOCOL"));
    let _ = fs::remove_dir_all(&dir);
}
