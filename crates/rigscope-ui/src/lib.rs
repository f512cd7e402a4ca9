//! UI model for rigscope.
//!
//! Holds the state the host UI renders: per camera six pose fields (position
//! in scene units, rotation in degrees) and four layer toggles, plus global
//! toggles that fan out to every camera. Widget construction is left to the
//! host.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod controls;
pub mod fields;

pub use controls::{CameraControls, ControlPanel};
pub use fields::{format_field, parse_numeric_field, PoseField, FIELD_PRECISION};
