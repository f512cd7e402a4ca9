//! rigscope: a viewer core for multi-camera capture rigs.
//!
//! Given a dataset of cameras (intrinsics, 4x4 extrinsics, hand keypoints,
//! image dimensions), rigscope builds every visual of the rig through a
//! [`Renderer`] and keeps each camera's visuals consistent while its pose is
//! edited.
//!
//! # Quick Start
//!
//! ```no_run
//! use rigscope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut scene = HeadlessScene::new();
//!     let mut registry = RigRegistry::new();
//!     let options = ViewerOptions::default();
//!
//!     let source = FileSource::new("data/hand_rig.json");
//!     let report = pollster::block_on(load_rig(&source, &mut scene, &mut registry, &options))?;
//!     println!("loaded {} cameras", report.loaded.len());
//!
//!     // Move camera "1" half a unit along X and tilt it.
//!     on_pose_edited(
//!         &mut registry,
//!         &mut scene,
//!         "1",
//!         DVec3::new(0.5, 0.0, 0.0),
//!         DVec3::new(0.0, 15.0, 0.0),
//!     )?;
//!
//!     // Once per frame: attach models and images that finished loading.
//!     scene.complete_pending_loads();
//!     registry.poll_assets(&mut scene);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`dataset`]: JSON dataset model and sources
//! - [`loader`]: builds one [`CameraDevice`] per camera record
//! - [`registry`]: owns the devices and their pending assets
//! - [`sync`]: applies pose edits
//! - [`ui_sync`]: keeps the [`ControlPanel`] and the devices in agreement

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod assets;
pub mod dataset;
pub mod loader;
pub mod registry;
pub mod sync;
pub mod ui_sync;

// Re-export core types
pub use rigscope_core::{
    compose, decompose, image_plane_pose, project_keypoints, project_to_image, resolve, Color,
    DMat3, DMat4, DVec2, DVec3, EulerXyz, ExtrinsicsConvention, Intrinsics, KeypointPolicy,
    LayerVisibility, Placement, RecordPolicy, ResolvedPose, Result, RigError, ScaleFactors,
    ViewerOptions, VisualLayer, HAND_EDGES, HAND_JOINT_COUNT,
};

// Re-export render types
pub use rigscope_render::{
    Appearance, AssetError, AssetFuture, HeadlessScene, ObjectHandle, ObjectKind, Renderer,
    SceneObject,
};

// Re-export structures
pub use rigscope_structures::{AssetOutcome, AssetSlot, CameraDevice, CameraSpec, ImageInfo};

// Re-export UI types
pub use rigscope_ui::{CameraControls, ControlPanel, PoseField};

pub use assets::AssetQueue;
pub use dataset::{DatasetSource, FileSource, InlineSource};
pub use loader::{load_rig, LoadReport, SkippedCamera};
pub use registry::{AssetPollSummary, RigRegistry};
pub use sync::{on_pose_edited, set_pose_field};
pub use ui_sync::{
    apply_camera_controls, build_control_panel, controls_from_device, refresh_controls,
    set_camera_layer_visibility, set_global_layer_visibility,
};

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
