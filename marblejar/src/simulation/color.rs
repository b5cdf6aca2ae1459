//! Marble colours.
//!
//! `Rgb` travels with each body so the rendering side can paint it; the
//! engine itself never looks at it. Serialized as a `#RRGGBB` string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Colours handed out in turn to marbles spawned without one.
pub const PALETTE: [Rgb; 8] = [
    Rgb::new(0x41, 0x69, 0xE1),
    Rgb::new(0xFF, 0x6B, 0x6B),
    Rgb::new(0x4E, 0xCD, 0xC4),
    Rgb::new(0x45, 0xB7, 0xD1),
    Rgb::new(0x96, 0xCE, 0xB4),
    Rgb::new(0xFF, 0xEA, 0xA7),
    Rgb::new(0xDD, 0xA0, 0xDD),
    Rgb::new(0x98, 0xD8, 0xC8),
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette entry for the `index`-th marble, wrapping around.
    pub fn palette(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    /// Shift every channel up by `amount` (fraction of full scale), clamped.
    pub fn lighten(self, amount: f64) -> Self {
        self.shift((amount * 255.0).round() as i32)
    }

    /// Shift every channel down by `amount` (fraction of full scale), clamped.
    pub fn darken(self, amount: f64) -> Self {
        self.shift(-(amount * 255.0).round() as i32)
    }

    fn shift(self, delta: i32) -> Self {
        let ch = |c: u8| (i32::from(c) + delta).clamp(0, 255) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Channels as 0..=1 floats, for renderers.
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        PALETTE[0]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
