use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use super::{fmt_real, impl_key_compare};

/// RGBA colour with float channels in `0.0..=1.0`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Color {
    #[allow(missing_docs)]
    pub r: f32,
    #[allow(missing_docs)]
    pub g: f32,
    #[allow(missing_docs)]
    pub b: f32,
    #[allow(missing_docs)]
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Create from channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque colour from three channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::new(r, g, b, 1.0)
    }

    /// Decode a packed `0xRRGGBBAA` integer
    pub fn from_rgba32(packed: u32) -> Self {
        let channel = |shift: u32| ((packed >> shift) & 0xff) as f32 / 255.0;
        Color::new(channel(24), channel(16), channel(8), channel(0))
    }

    /// Encode as packed `0xRRGGBBAA`
    pub fn to_rgba32(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 24) | (channel(self.g) << 16) | (channel(self.b) << 8) | channel(self.a)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_html(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let (r, g, b, a) = match hex.len() {
            6 => (byte(0)?, byte(2)?, byte(4)?, 0xff),
            8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            _ => return None,
        };
        Some(Color::from_rgba32(u32::from_be_bytes([r, g, b, a])))
    }

    /// Lowercase `rrggbbaa` hex, alpha omitted when opaque
    pub fn to_html(&self) -> String {
        let packed = self.to_rgba32();
        if packed & 0xff == 0xff {
            format!("{:06x}", packed >> 8)
        } else {
            format!("{:08x}", packed)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, c: Color) -> Color {
        Color::new(self.r + c.r, self.g + c.g, self.b + c.b, self.a + c.a)
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, c: Color) -> Color {
        Color::new(self.r - c.r, self.g - c.g, self.b - c.b, self.a - c.a)
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, c: Color) -> Color {
        Color::new(self.r * c.r, self.g * c.g, self.b * c.b, self.a * c.a)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, s: f32) -> Color {
        Color::new(self.r * s, self.g * s, self.b * s, self.a * s)
    }
}

impl Div<f32> for Color {
    type Output = Color;

    fn div(self, s: f32) -> Color {
        Color::new(self.r / s, self.g / s, self.b / s, self.a / s)
    }
}

impl_key_compare!(Color { r, g, b, a });

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in [self.r, self.g, self.b, self.a].into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt_real(c as f64, f)?;
        }
        f.write_str(")")
    }
}
