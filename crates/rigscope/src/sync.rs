//! Applies UI pose edits to camera devices.

use glam::DVec3;
use rigscope_core::{EulerXyz, Result, RigError};
use rigscope_render::Renderer;
use rigscope_ui::{parse_numeric_field, PoseField};

use crate::registry::RigRegistry;

/// Moves one camera to a new pose entered in the UI.
///
/// `rotation_degrees` is XYZ Euler angles in degrees. Every visual of the
/// camera is updated before this returns. Non-finite input is ignored and
/// `Ok(false)` is returned; the previous pose stays.
pub fn on_pose_edited(
    registry: &mut RigRegistry,
    renderer: &mut dyn Renderer,
    cam_id: &str,
    translation: DVec3,
    rotation_degrees: DVec3,
) -> Result<bool> {
    let policy = registry.options().keypoint_policy;
    let device = registry
        .get_mut(cam_id)
        .ok_or_else(|| RigError::CameraNotFound(cam_id.to_string()))?;

    if !translation.is_finite() || !rotation_degrees.is_finite() {
        log::warn!("camera '{cam_id}': ignoring non-finite pose edit");
        return Ok(false);
    }

    let rotation = EulerXyz::from_degrees(rotation_degrees);
    Ok(device.set_pose(translation, rotation, renderer, policy))
}

/// Edits one pose field from raw UI text.
///
/// Malformed text is ignored and `Ok(false)` is returned. The other five
/// fields keep the camera's current values.
pub fn set_pose_field(
    registry: &mut RigRegistry,
    renderer: &mut dyn Renderer,
    cam_id: &str,
    field: PoseField,
    raw: &str,
) -> Result<bool> {
    let pose = registry
        .get(cam_id)
        .ok_or_else(|| RigError::CameraNotFound(cam_id.to_string()))?
        .current_pose();

    let Some(value) = parse_numeric_field(raw) else {
        log::debug!("camera '{cam_id}': ignoring '{raw}' for {field}");
        return Ok(false);
    };

    let mut translation = pose.translation;
    let mut rotation_degrees = pose.rotation.to_degrees();
    if field.is_rotation() {
        rotation_degrees[field.axis()] = value;
    } else {
        translation[field.axis()] = value;
    }
    on_pose_edited(registry, renderer, cam_id, translation, rotation_degrees)
}
