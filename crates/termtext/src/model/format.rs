use serde::{Deserialize, Serialize};

/// Font weight, ordered from lightest to heaviest.
///
/// The ordering matters: the interpreter compares against [`FontWeight::Normal`]
/// when deciding whether text is "bright".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Dim/faint text (SGR 2).
    Light,
    /// Regular weight.
    #[default]
    Normal,
    /// Bold text (SGR 1, and SGR 5 slow blink).
    Bold,
    /// Extra bold text (SGR 6 rapid blink).
    Black,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn css_weight(self) -> u16 {
        match self {
            Self::Light => 300,
            Self::Normal => 400,
            Self::Bold => 700,
            Self::Black => 900,
        }
    }
}

/// Underline rendering style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderlineStyle {
    /// No underline.
    #[default]
    None,
    /// Single solid underline.
    Single,
}

/// Named colors of the eight-entry SGR palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    DarkGray,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl NamedColor {
    /// 8-bit RGB value of the color.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::DarkGray => (0x80, 0x80, 0x80),
            Self::Red => (0xff, 0x00, 0x00),
            Self::Green => (0x00, 0xff, 0x00),
            Self::Yellow => (0xff, 0xff, 0x00),
            Self::Blue => (0x00, 0x00, 0xff),
            Self::Magenta => (0xff, 0x00, 0xff),
            Self::Cyan => (0x00, 0xff, 0xff),
            Self::White => (0xff, 0xff, 0xff),
        }
    }
}

/// A foreground or background color.
///
/// `Default` means "no brush": the display widget's own color applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Widget default color.
    #[default]
    Default,
    /// Palette color.
    Named(NamedColor),
    /// 8-bit per channel RGB.
    Rgb { r: u8, g: u8, b: u8 },
    /// Normalized (0.0 to 1.0) RGB.
    RgbF { r: f64, g: f64, b: f64 },
}

impl Color {
    /// Neutral gray with every normalized channel set to `intensity`.
    pub fn gray(intensity: f64) -> Self {
        Self::RgbF {
            r: intensity,
            g: intensity,
            b: intensity,
        }
    }

    /// Resolve to 8-bit RGB, or `None` for [`Color::Default`].
    pub fn to_rgb8(self) -> Option<(u8, u8, u8)> {
        match self {
            Self::Default => None,
            Self::Named(named) => Some(named.rgb()),
            Self::Rgb { r, g, b } => Some((r, g, b)),
            Self::RgbF { r, g, b } => Some((unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(value: f64) -> u8 {
    // Clamped to 0..=255 before the cast.
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Font selection carried by a [`TextFormat`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Font family name.
    pub family: String,
    /// Named style within the family (e.g. "Bold Italic"), if one was selected.
    #[serde(default)]
    pub style_name: Option<String>,
    /// Point size.
    pub point_size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            style_name: None,
            point_size: 10.0,
        }
    }
}

/// Character format stamped onto inserted text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFormat {
    pub weight: FontWeight,
    pub italic: bool,
    pub underline: bool,
    pub underline_style: UnderlineStyle,
    pub strike_out: bool,
    pub foreground: Color,
    pub background: Color,
    pub font: Font,
}

impl TextFormat {
    /// Exchange foreground and background values.
    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.foreground, &mut self.background);
    }

    pub fn set_underline(&mut self, on: bool) {
        self.underline = on;
        self.underline_style = if on {
            UnderlineStyle::Single
        } else {
            UnderlineStyle::None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_ordered() {
        assert!(FontWeight::Light < FontWeight::Normal);
        assert!(FontWeight::Normal < FontWeight::Bold);
        assert!(FontWeight::Bold < FontWeight::Black);
    }

    #[test]
    fn gray_resolves_to_rounded_rgb() {
        assert_eq!(Color::gray(0.0).to_rgb8(), Some((0, 0, 0)));
        assert_eq!(Color::gray(1.0).to_rgb8(), Some((255, 255, 255)));
        assert_eq!(Color::gray(0.5).to_rgb8(), Some((128, 128, 128)));
        assert_eq!(Color::Default.to_rgb8(), None);
    }

    #[test]
    fn swap_twice_restores_colors() {
        let mut format = TextFormat {
            foreground: Color::Named(NamedColor::Red),
            background: Color::Rgb { r: 1, g: 2, b: 3 },
            ..TextFormat::default()
        };
        let original = format.clone();
        format.swap_colors();
        assert_eq!(format.foreground, Color::Rgb { r: 1, g: 2, b: 3 });
        format.swap_colors();
        assert_eq!(format, original);
    }
}
