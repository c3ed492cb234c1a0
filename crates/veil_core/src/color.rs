//! RGBA colors
//!
//! Colors cross the native bridge and configuration files as CSS-style hex
//! strings (`#rgb`, `#rrggbb`, `#rrggbbaa`), so parsing and formatting live
//! next to the type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned when a hex color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),

    #[error("color must have 3, 6, or 8 hex digits: {0:?}")]
    InvalidLength(String),

    #[error("invalid hex digit in color: {0:?}")]
    InvalidDigit(String),
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex_string(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|n| n * 17);
        let invalid = |_| ColorParseError::InvalidDigit(s.to_string());

        match digits.len() {
            3 => Ok(Color::from_rgba8(
                nibble(0).map_err(invalid)?,
                nibble(1).map_err(invalid)?,
                nibble(2).map_err(invalid)?,
                255,
            )),
            6 => Ok(Color::from_rgba8(
                byte(0).map_err(invalid)?,
                byte(2).map_err(invalid)?,
                byte(4).map_err(invalid)?,
                255,
            )),
            8 => Ok(Color::from_rgba8(
                byte(0).map_err(invalid)?,
                byte(2).map_err(invalid)?,
                byte(4).map_err(invalid)?,
                byte(6).map_err(invalid)?,
            )),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
