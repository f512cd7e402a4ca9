//! Synchronization between the UI model and camera devices.

use rigscope_core::{Result, RigError, VisualLayer};
use rigscope_render::Renderer;
use rigscope_structures::CameraDevice;
use rigscope_ui::{CameraControls, ControlPanel};

use crate::registry::RigRegistry;
use crate::sync::on_pose_edited;

/// Creates `CameraControls` from a device's current state.
#[must_use]
pub fn controls_from_device(device: &CameraDevice) -> CameraControls {
    let pose = device.current_pose();
    let mut controls = CameraControls::new(device.cam_id(), device.label());
    controls.set_pose(pose.translation, pose.rotation.to_degrees());
    controls.visibility = device.visibility();
    controls
}

/// Builds a control panel with one group per device, in load order.
///
/// Global toggles start from the registry's initial visibility.
#[must_use]
pub fn build_control_panel(registry: &RigRegistry) -> ControlPanel {
    let mut panel = ControlPanel::new();
    let initial = registry.options().initial_visibility;
    for layer in VisualLayer::ALL {
        panel.set_global(layer, initial.get(layer));
    }
    for device in registry.iter() {
        panel.insert(controls_from_device(device));
    }
    panel
}

/// Re-reads every device into its control group, adding missing groups and
/// dropping groups of devices that are gone.
pub fn refresh_controls(panel: &mut ControlPanel, registry: &RigRegistry) {
    let stale: Vec<String> = panel
        .iter()
        .filter(|c| !registry.contains(&c.cam_id))
        .map(|c| c.cam_id.clone())
        .collect();
    for cam_id in stale {
        panel.remove(&cam_id);
    }
    for device in registry.iter() {
        panel.insert(controls_from_device(device));
    }
}

/// Pushes a control group's pose and toggles to its device.
///
/// Afterwards the group is refreshed from the device, so an ignored edit
/// shows the pose that was kept. Returns whether the pose was applied.
pub fn apply_camera_controls(
    registry: &mut RigRegistry,
    renderer: &mut dyn Renderer,
    controls: &mut CameraControls,
) -> Result<bool> {
    let applied = on_pose_edited(
        registry,
        renderer,
        &controls.cam_id,
        controls.position(),
        controls.rotation_degrees(),
    )?;

    let device = registry
        .get_mut(&controls.cam_id)
        .ok_or_else(|| RigError::CameraNotFound(controls.cam_id.clone()))?;
    for layer in VisualLayer::ALL {
        if device.visibility().get(layer) != controls.toggle(layer) {
            device.set_layer_visible(layer, controls.toggle(layer), renderer);
        }
    }

    if !applied {
        *controls = controls_from_device(device);
    }
    Ok(applied)
}

/// Shows or hides one layer on one camera and updates its checkbox.
pub fn set_camera_layer_visibility(
    registry: &mut RigRegistry,
    panel: &mut ControlPanel,
    renderer: &mut dyn Renderer,
    cam_id: &str,
    layer: VisualLayer,
    visible: bool,
) -> Result<()> {
    let device = registry
        .get_mut(cam_id)
        .ok_or_else(|| RigError::CameraNotFound(cam_id.to_string()))?;
    device.set_layer_visible(layer, visible, renderer);
    if let Some(controls) = panel.get_mut(cam_id) {
        controls.set_toggle(layer, visible);
    }
    Ok(())
}

/// Applies a global toggle to every camera and syncs every checkbox.
pub fn set_global_layer_visibility(
    registry: &mut RigRegistry,
    panel: &mut ControlPanel,
    renderer: &mut dyn Renderer,
    layer: VisualLayer,
    visible: bool,
) {
    for device in registry.iter_mut() {
        device.set_layer_visible(layer, visible, renderer);
    }
    panel.set_global(layer, visible);
    log::debug!("{layer} set to {visible} on {} cameras", registry.len());
}
