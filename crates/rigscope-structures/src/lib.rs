//! Camera devices for rigscope.
//!
//! A [`CameraDevice`] owns one camera's pose and every visual derived from
//! it: model, axes, label, keypoint markers, skeleton edges, projection rays,
//! the image-plane placeholder and the textured image.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Device construction creates every visual in one place
#![allow(clippy::too_many_lines)]

pub mod asset;
pub mod camera_device;

pub use asset::{AssetOutcome, AssetSlot, CancelToken, FinishedAsset, PendingAsset};
pub use camera_device::{CameraDevice, CameraParams, CameraSpec, ImageInfo};
