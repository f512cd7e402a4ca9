//! The six numeric pose fields and text parsing for them.

use std::fmt;

/// Decimal places shown in pose fields.
pub const FIELD_PRECISION: usize = 4;

/// One of the six numeric inputs of a camera's pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseField {
    PosX,
    PosY,
    PosZ,
    /// Rotation fields are in degrees.
    RotX,
    RotY,
    RotZ,
}

impl PoseField {
    /// All fields, in UI order.
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::PosY,
        Self::PosZ,
        Self::RotX,
        Self::RotY,
        Self::RotZ,
    ];

    /// Returns true for the rotation fields.
    pub fn is_rotation(self) -> bool {
        matches!(self, Self::RotX | Self::RotY | Self::RotZ)
    }

    /// Component index (0 = x, 1 = y, 2 = z).
    pub fn axis(self) -> usize {
        match self {
            Self::PosX | Self::RotX => 0,
            Self::PosY | Self::RotY => 1,
            Self::PosZ | Self::RotZ => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PosX => "Position X",
            Self::PosY => "Position Y",
            Self::PosZ => "Position Z",
            Self::RotX => "Rotation X",
            Self::RotY => "Rotation Y",
            Self::RotZ => "Rotation Z",
        }
    }
}

impl fmt::Display for PoseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the raw text of a numeric field.
///
/// Surrounding whitespace is ignored. Returns `None` for empty, malformed or
/// non-finite input.
pub fn parse_numeric_field(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Formats a value the way pose fields display it.
pub fn format_field(value: f64) -> String {
    format!("{value:.prec$}", prec = FIELD_PRECISION)
}
