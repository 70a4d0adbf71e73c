//! Packed opaque colors and HSL/HSV conversions.
//!
//! The two conversions keep their own hue conventions: `hsl_to_rgb` takes a
//! hue normalized to [0, 1) and wraps periodically, `hsv_to_rgb` takes a hue
//! in degrees and picks one of six 60° sectors.

use std::fmt;
use std::str::FromStr;

use crate::Rgb;

/// Opaque 8-bit RGB color packed as `0xAABBGGRR`.
///
/// Red lives in the low byte so the channels come out in R, G, B order when
/// the encoder walks from least to most significant byte. Alpha is always
/// `0xFF` and never written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0xff00_0000);
    pub const WHITE: Color = Color(0xffff_ffff);
    pub const RED: Color = Color(0xff00_00ff);

    const ALPHA: u32 = 0xff00_0000;

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Self::ALPHA | (b as u32) << 16 | (g as u32) << 8 | r as u32)
    }

    /// Build from a packed `0xAABBGGRR` value; alpha is forced opaque.
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed | Self::ALPHA)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        self.0 as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn to_rgb(self) -> Rgb {
        [self.r(), self.g(), self.b()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse `#rrggbb` (leading `#` optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{}' (expected #rrggbb)", s));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid color '{}': {}", s, e))
        };
        Ok(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// One channel of the HSL conversion; `t` is wrapped into [0, 1).
fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert HSL to an opaque color.
///
/// * `h` - Hue in [0, 1), wrapped periodically
/// * `s` - Saturation in [0, 1], clamped
/// * `l` - Lightness in [0, 1], clamped
///
/// Channels are scaled by 255 and rounded to nearest with ties away from
/// zero (`f32::round`).
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    Color::from_rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Convert HSV to an opaque color.
///
/// * `h` - Hue in degrees, normalized into [0, 360)
/// * `s` - Saturation in percent [0, 100], clamped
/// * `v` - Value in percent [0, 100], clamped
///
/// Channels are scaled by 255 and truncated.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 100.0) / 100.0;
    let v = v.clamp(0.0, 100.0) / 100.0;

    let c = s * v;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    // rem_euclid can round up to exactly 360.0; that lands in the last sector
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color::from_rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
