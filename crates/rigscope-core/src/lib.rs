//! Core math and configuration for rigscope.
//!
//! This crate holds everything that does not touch a renderer:
//! - [`euler`]: intrinsic XYZ Euler angles, 4x4 decomposition and composition
//! - [`pose`]: intrinsics, scale factors, and extrinsics-to-pose resolution
//! - [`keypoints`]: keypoint projection, the hand skeleton, image-plane placement
//! - [`options`]: viewer configuration
//! - [`error`]: the shared error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Single-letter math names (r00, fx, cx) are conventional here
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod color;
pub mod error;
pub mod euler;
pub mod keypoints;
pub mod options;
pub mod pose;
pub mod visibility;

pub use color::Color;
pub use error::{Result, RigError};
pub use euler::{compose, decompose, matrix_from_rows, EulerXyz, RigidityCheck};
pub use keypoints::{image_plane_pose, project_keypoints, HAND_EDGES, HAND_JOINT_COUNT};
pub use options::{KeypointPolicy, RecordPolicy, ViewerOptions};
pub use pose::{
    project_to_image, resolve, ExtrinsicsConvention, Intrinsics, Placement, Resolution,
    ResolvedPose, ScaleFactors,
};
pub use visibility::{LayerVisibility, VisualLayer};

// Re-export glam types for convenience
pub use glam::{DMat3, DMat4, DVec2, DVec3};
