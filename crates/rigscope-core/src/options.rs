//! Configuration options for rigscope.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pose::{ExtrinsicsConvention, ScaleFactors};
use crate::visibility::LayerVisibility;

/// Global configuration options for loading and displaying a rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Scale factors used when a camera record does not carry its own.
    pub default_scale: ScaleFactors,

    /// How extrinsics matrices are interpreted.
    pub convention: ExtrinsicsConvention,

    /// Whether keypoints follow the camera when its pose is edited.
    pub keypoint_policy: KeypointPolicy,

    /// What to do with malformed camera records.
    pub record_policy: RecordPolicy,

    /// Tolerance for the rigid-transform check on extrinsics.
    pub rigid_tolerance: f64,

    /// Image pixels per scene unit, for the plane and the textured image.
    pub pixels_per_unit: f64,

    /// Keypoint marker size in scene units.
    pub marker_size: f64,

    /// Length of each camera's axes indicator.
    pub axes_size: f64,

    /// Opacity of the image-plane placeholder.
    pub plane_opacity: f64,

    /// Opacity of the textured image.
    pub image_opacity: f64,

    /// Opacity of projection rays.
    pub ray_opacity: f64,

    /// Opacity of the camera model, drawn in the camera color.
    pub model_opacity: f64,

    /// Whether camera models get a wireframe overlay.
    pub model_wireframe: bool,

    /// Camera model loaded for cameras without their own.
    pub model_path: Option<String>,

    /// Layer visibility applied to every camera at load.
    pub initial_visibility: LayerVisibility,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            default_scale: ScaleFactors::default(),
            convention: ExtrinsicsConvention::CameraToWorld,
            keypoint_policy: KeypointPolicy::FixedAtLoad,
            record_policy: RecordPolicy::SkipInvalid,
            rigid_tolerance: 1e-3,
            pixels_per_unit: 1000.0,
            marker_size: 0.005,
            axes_size: 0.1,
            plane_opacity: 0.5,
            image_opacity: 0.6,
            ray_opacity: 0.5,
            model_opacity: 0.2,
            model_wireframe: true,
            model_path: Some("assets/camera.obj".to_string()),
            initial_visibility: LayerVisibility::ALL_VISIBLE,
        }
    }
}

impl ViewerOptions {
    /// Reads options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses options from JSON text. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Sets the keypoint policy.
    #[must_use]
    pub fn with_keypoint_policy(mut self, policy: KeypointPolicy) -> Self {
        self.keypoint_policy = policy;
        self
    }

    /// Sets the record policy.
    #[must_use]
    pub fn with_record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    /// Sets the extrinsics convention.
    #[must_use]
    pub fn with_convention(mut self, convention: ExtrinsicsConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the default camera model path.
    #[must_use]
    pub fn with_model_path(mut self, path: Option<String>) -> Self {
        self.model_path = path;
        self
    }
}

/// Whether keypoint world positions follow pose edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KeypointPolicy {
    /// Keypoints are ground truth; markers, skeleton edges and the keypoint
    /// end of each ray stay at their load-time positions.
    #[default]
    FixedAtLoad,
    /// Keypoints are re-projected from the edited pose.
    FollowCamera,
}

/// How the loader treats a malformed camera record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecordPolicy {
    /// Log and skip the camera; the rest of the rig still loads.
    #[default]
    SkipInvalid,
    /// Abort the whole load on the first malformed camera.
    FailFast,
}
