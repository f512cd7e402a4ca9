//! Display colors.

use serde::{Deserialize, Serialize};

/// An RGB display color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Neutral gray, used when a camera has no color.
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5);
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a color from `[0, 1]` components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0..=255` components.
    ///
    /// Returns `None` if any component is out of range or not finite.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_rgb255(rgb: [f64; 3]) -> Option<Self> {
        if rgb.iter().all(|c| c.is_finite() && (0.0..=255.0).contains(c)) {
            Some(Self::new(
                (rgb[0] / 255.0) as f32,
                (rgb[1] / 255.0) as f32,
                (rgb[2] / 255.0) as f32,
            ))
        } else {
            None
        }
    }

    /// Parses `#rrggbb`, `#rgb`, or `rgb(r, g, b)` with 0-255 components.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let inner = text
            .strip_prefix("rgb(")
            .or_else(|| text.strip_prefix("RGB("))?
            .strip_suffix(')')?;
        let parts: Vec<f64> = inner
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Self::from_rgb255([*r, *g, *b]),
            _ => None,
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let digits: Vec<u8> = match hex.len() {
            6 => (0..3)
                .map(|i| u8::from_str_radix(hex.get(2 * i..2 * i + 2)?, 16).ok())
                .collect::<Option<_>>()?,
            3 => hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
                .collect::<Option<_>>()?,
            _ => return None,
        };
        Self::from_rgb255([
            f64::from(digits[0]),
            f64::from(digits[1]),
            f64::from(digits[2]),
        ])
    }

    /// Returns `[r, g, b]`.
    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GRAY
    }
}
