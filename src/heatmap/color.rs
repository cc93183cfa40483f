use super::InvalidArgument;
use ratatui::style::Color;
use std::fmt;

/// Highest contribution level that gets its own shade; anything above is
/// drawn like this
pub(crate) const MAX_LEVEL: u32 = 4;

/// Fill for days without contributions
pub(crate) const EMPTY_COLOR: Rgb = Rgb::new(0xEE, 0xEE, 0xEE);

/// Fraction of the remaining saturation headroom gained at the top level
const SATURATION_GAIN: f32 = 0.5;

/// Fraction of the base color's value (brightness) lost at the top level
const VALUE_LOSS: f32 = 0.45;

static NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("darkgray", Rgb::new(0x44, 0x44, 0x44)),
    ("gray", Rgb::new(0x88, 0x88, 0x88)),
    ("lightgray", Rgb::new(0xCC, 0xCC, 0xCC)),
    ("white", Rgb::new(0xFF, 0xFF, 0xFF)),
    ("red", Rgb::new(0xFF, 0x00, 0x00)),
    ("green", Rgb::new(0x00, 0xFF, 0x00)),
    ("blue", Rgb::new(0x00, 0x00, 0xFF)),
    ("yellow", Rgb::new(0xFF, 0xFF, 0x00)),
    ("cyan", Rgb::new(0x00, 0xFF, 0xFF)),
    ("magenta", Rgb::new(0xFF, 0x00, 0xFF)),
    ("aqua", Rgb::new(0x00, 0xFF, 0xFF)),
    ("fuchsia", Rgb::new(0xFF, 0x00, 0xFF)),
    ("darkgrey", Rgb::new(0x44, 0x44, 0x44)),
    ("grey", Rgb::new(0x88, 0x88, 0x88)),
    ("lightgrey", Rgb::new(0xCC, 0xCC, 0xCC)),
    ("lime", Rgb::new(0x00, 0xFF, 0x00)),
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
    ("olive", Rgb::new(0x80, 0x80, 0x00)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("silver", Rgb::new(0xC0, 0xC0, 0xC0)),
    ("teal", Rgb::new(0x00, 0x80, 0x80)),
];

/// An opaque 24-bit color
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    fn to_hsv(self) -> Hsv {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let value = f32::from(max) / 255.0;
        if max == min {
            return Hsv {
                hue: 0.0,
                saturation: 0.0,
                value,
            };
        }
        let delta = f32::from(max - min);
        let (r, g, b) = (f32::from(self.r), f32::from(self.g), f32::from(self.b));
        let sector = if max == self.r {
            (g - b) / delta
        } else if max == self.g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        Hsv {
            hue: (sector * 60.0).rem_euclid(360.0),
            saturation: delta / f32::from(max),
            value,
        }
    }

    fn from_hsv(hsv: Hsv) -> Rgb {
        let chroma = hsv.value * hsv.saturation;
        let sector = hsv.hue.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = if sector < 1.0 {
            (chroma, x, 0.0)
        } else if sector < 2.0 {
            (x, chroma, 0.0)
        } else if sector < 3.0 {
            (0.0, chroma, x)
        } else if sector < 4.0 {
            (0.0, x, chroma)
        } else if sector < 5.0 {
            (x, 0.0, chroma)
        } else {
            (chroma, 0.0, x)
        };
        let m = hsv.value - chroma;
        Rgb::new(channel(r + m), channel(g + m), channel(b + m))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Color {
        Color::Rgb(value.r, value.g, value.b)
    }
}

// Hue in degrees; saturation & value in [0.0, 1.0]
#[derive(Clone, Copy, Debug, PartialEq)]
struct Hsv {
    hue: f32,
    saturation: f32,
    value: f32,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Shade `base` for a day with the given contribution level.
///
/// Level 0 is the neutral [`EMPTY_COLOR`] and level 1 is `base` itself.  Each
/// level above that pushes the color's saturation toward full and darkens it,
/// so saturation never decreases as the level goes up.  Levels above
/// [`MAX_LEVEL`] are drawn as `MAX_LEVEL`.
pub(crate) fn calculate_level_color(base: Rgb, level: u32) -> Rgb {
    let step = match level.min(MAX_LEVEL) {
        0 => return EMPTY_COLOR,
        1 => return base,
        2 => 1.0 / 3.0,
        3 => 2.0 / 3.0,
        _ => 1.0,
    };
    let hsv = base.to_hsv();
    let saturation = if hsv.saturation > 0.0 {
        hsv.saturation + (1.0 - hsv.saturation) * step * SATURATION_GAIN
    } else {
        0.0
    };
    Rgb::from_hsv(Hsv {
        hue: hsv.hue,
        saturation,
        value: hsv.value * (1.0 - VALUE_LOSS * step),
    })
}

/// Converts user-supplied color strings into colors
pub(crate) trait ColorParser: fmt::Debug + Send {
    fn parse(&self, s: &str) -> Result<Rgb, InvalidArgument>;
}

/// Accepts `#RRGGBB`, `#AARRGGBB` (alpha is ignored), and a small table of
/// color names, case-insensitively
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct StandardColorParser;

impl ColorParser for StandardColorParser {
    fn parse(&self, s: &str) -> Result<Rgb, InvalidArgument> {
        let invalid = || InvalidArgument::Color(s.to_owned());
        if let Some(hex) = s.strip_prefix('#') {
            if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            let [_, r, g, b] = value.to_be_bytes();
            Ok(Rgb::new(r, g, b))
        } else {
            NAMED_COLORS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(s))
                .map(|&(_, color)| color)
                .ok_or_else(invalid)
        }
    }
}
