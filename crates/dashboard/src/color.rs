//! Colors used by routes, charts, and metric labels.
//!
//! Colors are plain 8-bit RGB triples written and read as six hex digits
//! (`"FF8C42"`), which is also how they serialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Expected 6 hex digits, got {0:?}")]
    Length(String),
    #[error("Invalid hex digits in {0:?}")]
    Digits(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `RRGGBB` (case-insensitive, no leading `#`).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorError::Length(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorError::Digits(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0..=1, the form most renderers expect.
    pub fn to_unit_rgb(&self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// Metric colors
pub const CALORIES_BURNED: Color = Color::rgb(0xFF, 0x8C, 0x42);
pub const BASAL_CALORIES_BURNED: Color = Color::rgb(0xFF, 0xB8, 0x75);
pub const DISTANCE: Color = Color::rgb(0x00, 0xC4, 0x9A);
pub const DURATION: Color = Color::rgb(0xFF, 0xC1, 0x07);
pub const ELEVATION_ASCENDED: Color = Color::rgb(0xA2, 0xC2, 0x72);
pub const END_TIME: Color = Color::rgb(0x9A, 0xA0, 0xA6);
pub const HEART_RATE: Color = Color::rgb(0xFF, 0x4D, 0x6D);
pub const HIKE: Color = Color::rgb(0x4C, 0xAF, 0x50);
pub const PACE: Color = Color::rgb(0xFF, 0xD5, 0x4F);
pub const RUN: Color = Color::rgb(0x9C, 0x27, 0xB0);
pub const START_TIME: Color = Color::rgb(0x9A, 0xA0, 0xA6);
pub const STEP_COUNT: Color = Color::rgb(0x3D, 0xA9, 0xFC);
pub const ACCENT: Color = Color::rgb(0x00, 0x7A, 0xFF);

// Heart-rate zones, easy to max
pub const ZONE_1: Color = Color::rgb(0x64, 0xB5, 0xF6);
pub const ZONE_2: Color = Color::rgb(0x4C, 0xAF, 0x50);
pub const ZONE_3: Color = Color::rgb(0xFF, 0xC1, 0x07);
pub const ZONE_4: Color = Color::rgb(0xFF, 0x6D, 0x00);
pub const ZONE_5: Color = Color::rgb(0xD5, 0x00, 0x00);

/// Route speed palette, slowest first.
pub const ROUTE_COLORS: [Color; 8] = [
    Color::rgb(0x29, 0x62, 0xFF),
    Color::rgb(0x44, 0x8A, 0xFF),
    Color::rgb(0x00, 0xC4, 0xB4),
    Color::rgb(0x00, 0xE6, 0x76),
    Color::rgb(0xAE, 0xEA, 0x00),
    Color::rgb(0xFF, 0xB3, 0x00),
    Color::rgb(0xFF, 0x6D, 0x00),
    Color::rgb(0xD5, 0x00, 0x00),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = Color::from_hex("ff8c42").unwrap();
        assert_eq!(color, CALORIES_BURNED);
        assert_eq!(color.to_hex(), "FF8C42");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(Color::from_hex("#FF8C42"), Err(ColorError::Length(_))));
        assert!(matches!(Color::from_hex("FFF"), Err(ColorError::Length(_))));
        assert!(matches!(Color::from_hex("GG0000"), Err(ColorError::Digits(_))));
        assert!(Color::from_hex("ÿÿÿ").is_err());
    }

    #[test]
    fn test_serializes_as_hex() {
        let json = serde_json::to_string(&ROUTE_COLORS[0]).unwrap();
        assert_eq!(json, "\"2962FF\"");

        let parsed: Color = serde_json::from_str("\"d50000\"").unwrap();
        assert_eq!(parsed, ROUTE_COLORS[7]);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_unit_rgb() {
        let [r, g, b] = Color::rgb(255, 0, 51).to_unit_rgb();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-9);
    }
}
