//! Per-camera control groups and the panel that holds them.

use std::collections::HashMap;

use glam::DVec3;
use rigscope_core::{LayerVisibility, VisualLayer};

use crate::fields::{format_field, parse_numeric_field, PoseField};

/// The controls for one camera: six pose fields and four layer toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControls {
    pub cam_id: String,
    pub label: String,
    /// Position in scene units.
    pub position: [f64; 3],
    /// Rotation in degrees, XYZ order.
    pub rotation_degrees: [f64; 3],
    /// Checkbox state of the four layer toggles.
    pub visibility: LayerVisibility,
}

impl CameraControls {
    pub fn new(cam_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            cam_id: cam_id.into(),
            label: label.into(),
            position: [0.0; 3],
            rotation_degrees: [0.0; 3],
            visibility: LayerVisibility::ALL_VISIBLE,
        }
    }

    /// Returns the value of one field.
    pub fn field(&self, field: PoseField) -> f64 {
        if field.is_rotation() {
            self.rotation_degrees[field.axis()]
        } else {
            self.position[field.axis()]
        }
    }

    /// Sets one field.
    pub fn set_field(&mut self, field: PoseField, value: f64) {
        if field.is_rotation() {
            self.rotation_degrees[field.axis()] = value;
        } else {
            self.position[field.axis()] = value;
        }
    }

    /// Returns the display text of one field.
    pub fn field_text(&self, field: PoseField) -> String {
        format_field(self.field(field))
    }

    /// Sets one field from raw text.
    ///
    /// Malformed text leaves the field unchanged and returns `None`.
    pub fn set_field_text(&mut self, field: PoseField, raw: &str) -> Option<f64> {
        let Some(value) = parse_numeric_field(raw) else {
            log::debug!("camera '{}': ignoring '{raw}' for {field}", self.cam_id);
            return None;
        };
        self.set_field(field, value);
        Some(value)
    }

    /// Fills all six fields.
    pub fn set_pose(&mut self, position: DVec3, rotation_degrees: DVec3) {
        self.position = position.to_array();
        self.rotation_degrees = rotation_degrees.to_array();
    }

    pub fn position(&self) -> DVec3 {
        DVec3::from_array(self.position)
    }

    pub fn rotation_degrees(&self) -> DVec3 {
        DVec3::from_array(self.rotation_degrees)
    }

    /// Returns the checkbox state of one layer toggle.
    pub fn toggle(&self, layer: VisualLayer) -> bool {
        self.visibility.get(layer)
    }

    pub fn set_toggle(&mut self, layer: VisualLayer, checked: bool) {
        self.visibility.set(layer, checked);
    }
}

/// All camera control groups, in load order, plus the global toggles.
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    groups: Vec<CameraControls>,
    index: HashMap<String, usize>,
    global: LayerVisibility,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group, replacing any existing group with the same id.
    pub fn insert(&mut self, controls: CameraControls) {
        if let Some(&i) = self.index.get(&controls.cam_id) {
            self.groups[i] = controls;
        } else {
            self.index.insert(controls.cam_id.clone(), self.groups.len());
            self.groups.push(controls);
        }
    }

    pub fn get(&self, cam_id: &str) -> Option<&CameraControls> {
        self.index.get(cam_id).map(|&i| &self.groups[i])
    }

    pub fn get_mut(&mut self, cam_id: &str) -> Option<&mut CameraControls> {
        self.index.get(cam_id).map(|&i| &mut self.groups[i])
    }

    /// Removes a group, keeping the order of the others.
    pub fn remove(&mut self, cam_id: &str) -> Option<CameraControls> {
        let i = self.index.remove(cam_id)?;
        let removed = self.groups.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Removes every group. Global toggles keep their state.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraControls> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the global toggle state.
    pub fn global(&self) -> LayerVisibility {
        self.global
    }

    /// Sets a global toggle and checks or unchecks it in every group.
    pub fn set_global(&mut self, layer: VisualLayer, checked: bool) {
        self.global.set(layer, checked);
        for group in &mut self.groups {
            group.set_toggle(layer, checked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_map_to_components() {
        let mut c = CameraControls::new("1", "Cam 1");
        c.set_pose(DVec3::new(1.0, 2.0, 3.0), DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(c.field(PoseField::PosY), 2.0);
        assert_eq!(c.field(PoseField::RotZ), 30.0);
        c.set_field(PoseField::RotX, -45.0);
        assert_eq!(c.rotation_degrees(), DVec3::new(-45.0, 20.0, 30.0));
        assert_eq!(c.field_text(PoseField::PosX), "1.0000");
    }

    #[test]
    fn test_malformed_text_keeps_value() {
        let mut c = CameraControls::new("1", "Cam 1");
        c.set_field(PoseField::PosZ, 0.25);
        assert_eq!(c.set_field_text(PoseField::PosZ, "0.2x"), None);
        assert_eq!(c.field(PoseField::PosZ), 0.25);
        assert_eq!(c.set_field_text(PoseField::PosZ, " 0.5 "), Some(0.5));
        assert_eq!(c.field(PoseField::PosZ), 0.5);
    }

    #[test]
    fn test_panel_lookup_and_order() {
        let mut panel = ControlPanel::new();
        for id in ["1", "2", "3"] {
            panel.insert(CameraControls::new(id, format!("Cam {id}")));
        }
        assert_eq!(panel.len(), 3);
        panel.remove("2");
        let ids: Vec<&str> = panel.iter().map(|c| c.cam_id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(panel.get("3").unwrap().label, "Cam 3");
        assert!(panel.get("2").is_none());

        panel.insert(CameraControls::new("3", "renamed"));
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.get("3").unwrap().label, "renamed");
    }

    #[test]
    fn test_global_toggle_syncs_groups() {
        let mut panel = ControlPanel::new();
        panel.insert(CameraControls::new("a", "A"));
        panel.insert(CameraControls::new("b", "B"));
        panel.set_global(VisualLayer::ProjectionLines, false);
        assert!(!panel.global().projection_lines);
        assert!(panel.iter().all(|c| !c.toggle(VisualLayer::ProjectionLines)));
        assert!(panel.iter().all(|c| c.toggle(VisualLayer::Image)));
    }
}
