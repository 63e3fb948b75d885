//! Fixed color tables used by the palette and extended-color codes.

use crate::model::{Color, NamedColor};

/// The eight-entry table shared by codes 30-37, 40-47, 90-97 and 100-107.
///
/// Dark colors are replaced by their light variants for readability on the
/// launcher's log background, so normal and bright codes resolve identically.
pub const PALETTE: [NamedColor; 8] = [
    NamedColor::DarkGray,
    NamedColor::Red,
    NamedColor::Green,
    NamedColor::Yellow,
    NamedColor::Blue,
    NamedColor::Magenta,
    NamedColor::Cyan,
    NamedColor::White,
];

/// First index of the 6x6x6 color cube in the 256-color palette.
pub const CUBE_START: u32 = 0x10;
/// Last index of the 6x6x6 color cube.
pub const CUBE_END: u32 = 0xE7;
/// First index of the grayscale ramp.
pub const GRAY_START: u32 = 0xE8;
/// Last index of the grayscale ramp.
pub const GRAY_END: u32 = 0xFF;

/// Palette entry `index` (0-7).
pub fn palette_color(index: u32) -> Option<Color> {
    usize::try_from(index)
        .ok()
        .and_then(|i| PALETTE.get(i))
        .map(|named| Color::Named(*named))
}

/// Decompose a cube index into channels in the range 0-5.
///
/// Channels are deliberately not rescaled to 0-255, and the least
/// significant base-6 digit lands in red. Returns `None` outside the cube.
pub fn cube_color(index: u32) -> Option<Color> {
    if !(CUBE_START..=CUBE_END).contains(&index) {
        return None;
    }
    let mut rest = index - CUBE_START;
    let r = rest % 6;
    rest /= 6;
    let g = rest % 6;
    rest /= 6;
    let b = rest % 6;
    rest /= 6;
    if rest != 0 {
        return None;
    }
    Some(Color::Rgb {
        r: u8::try_from(r).ok()?,
        g: u8::try_from(g).ok()?,
        b: u8::try_from(b).ok()?,
    })
}

/// Normalized gray for a ramp index, from black (0xE8) to white (0xFF).
pub fn gray_ramp(index: u32) -> Option<Color> {
    if !(GRAY_START..=GRAY_END).contains(&index) {
        return None;
    }
    let intensity = f64::from(index - GRAY_START) / f64::from(GRAY_END - GRAY_START);
    Some(Color::gray(intensity))
}
