/// Color types used for cover-art theming
use crate::error::{Result, VizionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit sRGB color, serialized as a lowercase `#rrggbb` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// `#000000`
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// `#ffffff`
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => {
                return Err(VizionError::invalid_input(format!(
                    "Invalid hex color: {}",
                    hex
                )))
            }
        };

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| VizionError::invalid_input(format!("Invalid hex color: {}", hex)))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = VizionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = VizionError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

/// Theme derived from cover art
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTriple {
    /// Dominant color of the artwork
    pub base: Rgb,
    /// Black or white, whichever reads on top of `base`
    pub contrast: Rgb,
    /// `base` with its hue rotated by 180 degrees
    pub complementary: Rgb,
}

impl ColorTriple {
    /// Neutral theme used whenever extraction fails
    pub const FALLBACK: ColorTriple = ColorTriple {
        base: Rgb::WHITE,
        contrast: Rgb::BLACK,
        complementary: Rgb::WHITE,
    };
}

impl Default for ColorTriple {
    fn default() -> Self {
        Self::FALLBACK
    }
}
