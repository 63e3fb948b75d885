//! Launcher configuration: release location, default console format and
//! font catalog.
//!
//! Files are JSON or YAML, picked by extension (`.yaml`/`.yml` is YAML,
//! anything else JSON). Every field has a default, so an empty object is a
//! valid configuration.

use crate::error::{TermtextError, TermtextResult};
use crate::model::{Color, Font, NamedColor, TextFormat};
use crate::sgr::StaticFontCatalog;
use crate::sysreq::{Platform, ToolVersionWindow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_RELEASE_DOMAIN: &str = "https://releases.axiodl.com/";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Base URL that platform directories hang off.
    pub release_domain: String,
    /// Platform directory on the release server.
    pub platform: String,
    /// PEM public key the release server's certificate must carry.
    pub pinned_public_key: Option<String>,
    pub default_format: FormatConfig,
    /// Family -> style names, indexed by SGR codes 11-19.
    pub fonts: StaticFontCatalog,
    pub requirements: ToolVersionWindow,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            release_domain: DEFAULT_RELEASE_DOMAIN.to_string(),
            platform: Platform::current().as_str().to_string(),
            pinned_public_key: None,
            default_format: FormatConfig::default(),
            fonts: StaticFontCatalog::new(),
            requirements: ToolVersionWindow::default(),
        }
    }
}

/// Console defaults that SGR resets return to.
///
/// Colors are `default`, a palette name such as `dark_gray` or `cyan`, or
/// `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub font_family: String,
    pub point_size: f32,
    pub foreground: String,
    pub background: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        let font = Font::default();
        Self {
            font_family: font.family,
            point_size: font.point_size,
            foreground: "default".to_string(),
            background: "default".to_string(),
        }
    }
}

impl FormatConfig {
    pub fn to_text_format(&self) -> TermtextResult<TextFormat> {
        Ok(TextFormat {
            foreground: config_color("default_format.foreground", &self.foreground)?,
            background: config_color("default_format.background", &self.background)?,
            font: Font {
                family: self.font_family.clone(),
                style_name: None,
                point_size: self.point_size,
            },
            ..TextFormat::default()
        })
    }
}

impl LauncherConfig {
    /// Check the values that deserialization cannot.
    pub fn validate(&self) -> TermtextResult<()> {
        if !self.release_domain.starts_with("https://") {
            return Err(TermtextError::config(
                "release_domain must be an https URL",
                serde_json::json!({ "release_domain": self.release_domain }),
            ));
        }
        if self.platform.trim().is_empty() {
            return Err(TermtextError::config("platform must not be empty", None));
        }
        if let Some(pem) = &self.pinned_public_key {
            if !(pem.contains("-----BEGIN ") && pem.contains("-----END ")) {
                return Err(TermtextError::config(
                    "pinned_public_key is not a PEM block",
                    None,
                ));
            }
        }
        if !self.requirements.is_valid() {
            return Err(TermtextError::config(
                "requirements window has a minimum above its maximum",
                serde_json::to_value(self.requirements).ok(),
            ));
        }
        if !(self.default_format.point_size.is_finite() && self.default_format.point_size > 0.0) {
            return Err(TermtextError::config(
                "default_format.point_size must be positive",
                serde_json::json!({ "point_size": self.default_format.point_size }),
            ));
        }
        self.default_format.to_text_format().map(|_| ())
    }

    /// Default console format.
    pub fn text_format(&self) -> TermtextResult<TextFormat> {
        self.default_format.to_text_format()
    }
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> TermtextResult<LauncherConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .map_err(|err| TermtextError::io("failed to read config file", err))?;
    let config = parse_config(&data, is_yaml(path))?;
    config.validate()?;
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn parse_config(data: &str, yaml: bool) -> TermtextResult<LauncherConfig> {
    if yaml {
        serde_yml::from_str(data).map_err(|err| {
            TermtextError::config(
                "failed to parse yaml config",
                serde_json::json!({ "source": err.to_string() }),
            )
        })
    } else {
        serde_json::from_str(data).map_err(|err| {
            TermtextError::config(
                "failed to parse json config",
                serde_json::json!({ "source": err.to_string() }),
            )
        })
    }
}

fn config_color(field: &str, value: &str) -> TermtextResult<Color> {
    parse_color(value).ok_or_else(|| {
        TermtextError::config(
            format!("{field} is not a color"),
            serde_json::json!({ "value": value }),
        )
    })
}

/// Parse `default`, a palette name or `#rrggbb`.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        };
        return Some(Color::Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        });
    }
    let named = match value.to_ascii_lowercase().as_str() {
        "default" => return Some(Color::Default),
        "dark_gray" | "darkgray" => NamedColor::DarkGray,
        "red" => NamedColor::Red,
        "green" => NamedColor::Green,
        "yellow" => NamedColor::Yellow,
        "blue" => NamedColor::Blue,
        "magenta" => NamedColor::Magenta,
        "cyan" => NamedColor::Cyan,
        "white" => NamedColor::White,
        _ => return None,
    };
    Some(Color::Named(named))
}
