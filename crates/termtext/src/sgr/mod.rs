//! SGR (Select Graphic Rendition) attribute interpreter.
//!
//! [`SgrInterpreter`] evolves a caller-owned [`TextFormat`] one numeric code
//! at a time. It holds only borrowed, immutable session state: the default
//! format that reset codes return to, and the [`FontCatalog`] used by the
//! alternate-font codes 11-19.
//!
//! # Key Operations
//!
//! - [`SgrInterpreter::interpret`] - apply one code, consuming extra
//!   parameters for extended colors (38/48)
//! - [`SgrInterpreter::apply`] - walk a whole parameter list in order
//!
//! # Example
//!
//! ```
//! use termtext::model::{Color, FontWeight, NamedColor, TextFormat};
//! use termtext::sgr::{NoFonts, SgrInterpreter, SgrParams};
//!
//! let defaults = TextFormat::default();
//! let interpreter = SgrInterpreter::new(&defaults, &NoFonts);
//! let mut format = defaults.clone();
//!
//! interpreter.apply(&SgrParams::parse("1;31"), &mut format);
//! assert_eq!(format.weight, FontWeight::Bold);
//! assert_eq!(format.foreground, Color::Named(NamedColor::Red));
//!
//! interpreter.apply(&SgrParams::parse("0"), &mut format);
//! assert_eq!(format, defaults);
//! ```
//!
//! Nothing here fails: unknown codes, malformed extended colors and
//! out-of-range font styles leave the format untouched.

pub mod palette;
pub mod params;

pub use params::{parse_value, ParamCursor, SgrParams};

use crate::model::{Color, FontWeight, TextFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Source of named styles for a font family.
pub trait FontCatalog {
    /// Style names of `family`, in the order codes 11-19 index them.
    fn styles(&self, family: &str) -> &[String];
}

/// Catalog without any fonts; codes 11-19 become no-ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFonts;

impl FontCatalog for NoFonts {
    fn styles(&self, _family: &str) -> &[String] {
        &[]
    }
}

/// Catalog backed by a family -> styles map, usually loaded from config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticFontCatalog {
    families: BTreeMap<String, Vec<String>>,
}

impl StaticFontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_family<I, S>(mut self, family: impl Into<String>, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families
            .insert(family.into(), styles.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl FontCatalog for StaticFontCatalog {
    fn styles(&self, family: &str) -> &[String] {
        self.families.get(family).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Which side of the format an extended color code targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Foreground,
    Background,
}

impl Layer {
    /// Code that indexed colors 0-7 alias to.
    fn base_code(self) -> u32 {
        match self {
            Self::Foreground => 30,
            Self::Background => 40,
        }
    }

    /// Code that indexed colors 8-15 alias to.
    fn bright_code(self) -> u32 {
        match self {
            Self::Foreground => 90,
            Self::Background => 100,
        }
    }

    fn set(self, format: &mut TextFormat, color: Color) {
        match self {
            Self::Foreground => format.foreground = color,
            Self::Background => format.background = color,
        }
    }
}

/// Interprets SGR codes against a fixed default format.
#[derive(Clone, Copy)]
pub struct SgrInterpreter<'a> {
    defaults: &'a TextFormat,
    fonts: &'a dyn FontCatalog,
}

impl std::fmt::Debug for SgrInterpreter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SgrInterpreter")
            .field("defaults", self.defaults)
            .finish_non_exhaustive()
    }
}

impl<'a> SgrInterpreter<'a> {
    pub fn new(defaults: &'a TextFormat, fonts: &'a dyn FontCatalog) -> Self {
        Self { defaults, fonts }
    }

    /// The reset target for this session.
    pub fn defaults(&self) -> &'a TextFormat {
        self.defaults
    }

    /// Interpret every code of `params` in order.
    ///
    /// An empty list means `0`. Tokens that are not numbers are skipped.
    pub fn apply(&self, params: &SgrParams, format: &mut TextFormat) {
        let mut cursor = params.cursor();
        if !cursor.has_next() {
            self.interpret(0, &mut cursor, format);
            return;
        }
        while let Some(token) = cursor.next() {
            match parse_value(token) {
                Some(code) => self.interpret(code, &mut cursor, format),
                None => trace!(token, "skipping non-numeric SGR parameter"),
            }
        }
    }

    /// Apply one attribute code to `format`.
    ///
    /// Codes 38 and 48 consume their selector and color parameters from
    /// `params`; indexed colors 0-15 are re-dispatched as the equivalent
    /// palette code with the same cursor and format.
    pub fn interpret(&self, code: u32, params: &mut ParamCursor<'_>, format: &mut TextFormat) {
        match code {
            0 => *format = self.defaults.clone(),
            1 | 5 => format.weight = FontWeight::Bold,
            2 => format.weight = FontWeight::Light,
            3 => format.italic = true,
            4 => format.set_underline(true),
            6 => format.weight = FontWeight::Black,
            7 | 27 => format.swap_colors(),
            // Concealed: draw text in the background color.
            8 => format.foreground = format.background,
            9 => format.strike_out = true,
            10 => format.font = self.defaults.font.clone(),
            11..=19 => self.select_font_style(code - 11, format),
            // Fraktur and the reserved code.
            20 | 26 => {}
            21 | 22 | 25 => format.weight = FontWeight::Normal,
            23 => format.italic = false,
            24 | 29 => format.set_underline(false),
            28 => {
                format.foreground = self.defaults.foreground;
                format.background = self.defaults.background;
            }
            30..=37 => set_palette(format, Layer::Foreground, code - 30),
            38 => self.extended_color(params, format, Layer::Foreground),
            39 => format.foreground = self.defaults.foreground,
            40..=47 => set_palette(format, Layer::Background, code - 40),
            48 => self.extended_color(params, format, Layer::Background),
            49 => format.background = self.defaults.background,
            90..=97 => set_palette(format, Layer::Foreground, code - 90),
            100..=107 => set_palette(format, Layer::Background, code - 100),
            _ => trace!(code, "ignoring unsupported SGR code"),
        }
    }

    fn select_font_style(&self, index: u32, format: &mut TextFormat) {
        let styles = self.fonts.styles(&format.font.family);
        let style = usize::try_from(index).ok().and_then(|i| styles.get(i));
        match style {
            Some(style) => format.font.style_name = Some(style.clone()),
            None => trace!(
                index,
                family = %format.font.family,
                "font style index out of range"
            ),
        }
    }

    /// `38;2;R;G;B`, `38;5;N` and their `48` counterparts.
    fn extended_color(&self, params: &mut ParamCursor<'_>, format: &mut TextFormat, layer: Layer) {
        let Some(selector) = params.next_value() else {
            trace!(?layer, "extended color without selector");
            return;
        };
        let color = match selector {
            2 => read_rgb(params),
            5 => {
                let Some(index) = params.next_value() else {
                    trace!(?layer, "indexed color without index");
                    return;
                };
                match index {
                    0x00..=0x07 => {
                        return self.interpret(layer.base_code() + index, params, format);
                    }
                    0x08..=0x0F => {
                        return self.interpret(layer.bright_code() + (index - 0x08), params, format);
                    }
                    palette::CUBE_START..=palette::CUBE_END => palette::cube_color(index),
                    palette::GRAY_START..=palette::GRAY_END => palette::gray_ramp(index),
                    _ => None,
                }
            }
            _ => None,
        };
        match color {
            Some(color) => layer.set(format, color),
            None => trace!(?layer, selector, "abandoning malformed extended color"),
        }
    }
}

fn set_palette(format: &mut TextFormat, layer: Layer, index: u32) {
    if let Some(color) = palette::palette_color(index) {
        layer.set(format, color);
    }
}

fn read_rgb(params: &mut ParamCursor<'_>) -> Option<Color> {
    let r = u8::try_from(params.next_value()?).ok()?;
    let g = u8::try_from(params.next_value()?).ok()?;
    let b = u8::try_from(params.next_value()?).ok()?;
    Some(Color::Rgb { r, g, b })
}
