//! Common test helper functions.
//!
//! These utilities reduce boilerplate in integration tests: unique temp
//! directories, JSON input files and locating the fixture binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use termtext::config::LauncherConfig;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Create a unique temporary directory for a test.
///
/// The name combines a timestamp and a per-process counter, so parallel
/// tests never collide.
///
/// # Panics
///
/// Panics if the directory cannot be created.
#[must_use]
pub fn temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    dir.push(format!(
        "termtext-{prefix}-{stamp}-{}-{sequence}",
        std::process::id()
    ));

    #[allow(clippy::expect_used)]
    fs::create_dir_all(&dir).expect("failed to create temp directory");

    dir
}

/// Serialize any value to a pretty JSON file.
///
/// # Panics
///
/// Panics if serialization or file writing fails.
pub fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) {
    #[allow(clippy::expect_used)]
    let data = serde_json::to_vec_pretty(value).expect("failed to serialize value");

    #[allow(clippy::expect_used)]
    fs::write(path, data).expect("failed to write json file");
}

/// Write a launcher configuration to a JSON file.
///
/// # Panics
///
/// Panics if serialization or file writing fails.
pub fn write_config(path: &Path, config: &LauncherConfig) {
    write_json(path, config);
}

/// Locate a fixture binary next to another workspace binary.
///
/// Cargo only builds the fixture binaries for a workspace build, so tests
/// should skip when this returns `None`.
pub fn fixture_path(sibling_binary: &str, name: &str) -> Option<PathBuf> {
    let fixture = Path::new(sibling_binary).parent()?.join(name);
    fixture.exists().then_some(fixture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_creates_unique_directories() {
        let dir1 = temp_dir("test");
        let dir2 = temp_dir("test");

        assert!(dir1.exists());
        assert!(dir2.exists());
        assert_ne!(dir1, dir2);

        // Cleanup
        let _ = fs::remove_dir_all(&dir1);
        let _ = fs::remove_dir_all(&dir2);
    }

    #[test]
    fn written_config_loads_back() {
        let dir = temp_dir("config");
        let path = dir.join("launcher.json");
        let config = LauncherConfig {
            platform: "linux".to_string(),
            ..LauncherConfig::default()
        };
        write_config(&path, &config);

        let loaded = termtext::config::load_config(&path).ok();
        assert_eq!(loaded, Some(config));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_fixture_is_none() {
        assert_eq!(fixture_path("/nonexistent/bin/termtext", "termtext-progress"), None);
    }
}
