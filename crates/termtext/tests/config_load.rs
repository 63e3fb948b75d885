// Test module - relaxed lint rules
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]
#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use termtext::config::{load_config, LauncherConfig, DEFAULT_RELEASE_DOMAIN};
use termtext::model::{Color, NamedColor};
use termtext::sgr::FontCatalog;
use termtext::sysreq::ToolVersionWindow;
use termtext::ErrorCode;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn loads_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "launcher.json",
        r##"{
            "release_domain": "https://mirror.example.org/releases/",
            "platform": "linux",
            "default_format": { "font_family": "Hack", "point_size": 11.5, "foreground": "#c0c0c0" },
            "fonts": { "Hack": ["Regular", "Bold", "Italic"] },
            "requirements": { "min_major": 2, "max_major": 3, "min_minor": 80, "max_minor": 93 }
        }"##,
    );
    let config = load_config(&path).unwrap();
    assert_eq!(config.release_domain, "https://mirror.example.org/releases/");
    assert_eq!(config.fonts.styles("Hack").len(), 3);
    assert_eq!(config.requirements.max_minor, 93);

    let format = config.text_format().unwrap();
    assert_eq!(format.font.family, "Hack");
    assert_eq!(format.font.point_size, 11.5);
    assert_eq!(
        format.foreground,
        Color::Rgb {
            r: 0xc0,
            g: 0xc0,
            b: 0xc0
        }
    );
    assert_eq!(format.background, Color::Default);
}

#[test]
fn loads_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "launcher.yaml",
        "platform: macos\n\
         default_format:\n  background: dark_gray\n\
         pinned_public_key: |\n  -----BEGIN PUBLIC KEY-----\n  MIIBIjANBgkq\n  -----END PUBLIC KEY-----\n",
    );
    let config = load_config(&path).unwrap();
    assert_eq!(config.platform, "macos");
    assert_eq!(config.release_domain, DEFAULT_RELEASE_DOMAIN);
    assert!(config
        .pinned_public_key
        .as_deref()
        .is_some_and(|pem| pem.starts_with("-----BEGIN PUBLIC KEY-----")));
    assert_eq!(
        config.text_format().unwrap().background,
        Color::Named(NamedColor::DarkGray)
    );
    assert_eq!(config.requirements, ToolVersionWindow::default());
}

#[test]
fn yml_extension_is_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "launcher.yml", "platform: win32\n");
    assert_eq!(load_config(&path).unwrap().platform, "win32");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.code, ErrorCode::Io);
    assert_eq!(err.exit_code(), 7);
}

#[test]
fn unknown_field_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "launcher.json", r#"{ "release_domian": "https://x/" }"#);
    let err = load_config(&path).unwrap_err();
    assert_eq!(err.code, ErrorCode::Config);
}

#[test]
fn invalid_values_are_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in [
        ("http.json", r#"{ "release_domain": "http://releases.example.org/" }"#),
        ("platform.json", r#"{ "platform": "  " }"#),
        ("pem.json", r#"{ "pinned_public_key": "not a key" }"#),
        (
            "window.json",
            r#"{ "requirements": { "min_major": 3, "max_major": 2, "min_minor": 0, "max_minor": 0 } }"#,
        ),
        ("color.json", r#"{ "default_format": { "foreground": "chartreuse" } }"#),
        ("size.json", r#"{ "default_format": { "point_size": 0 } }"#),
    ] {
        let path = write(&dir, name, contents);
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::Config, "{name}");
    }
}

#[test]
fn default_config_round_trips_through_json() {
    let config = LauncherConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: LauncherConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
