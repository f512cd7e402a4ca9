//! The registry of loaded camera devices.

use std::collections::HashMap;

use glam::DVec3;
use rigscope_core::{Result, RigError, ViewerOptions};
use rigscope_render::Renderer;
use rigscope_structures::{AssetOutcome, CameraDevice, PendingAsset};

use crate::assets::AssetQueue;

/// What one call to [`RigRegistry::poll_assets`] did.
#[derive(Debug, Default)]
pub struct AssetPollSummary {
    /// Assets attached to their device.
    pub attached: usize,
    /// Late assets released because their device was gone.
    pub discarded: usize,
    /// Loads that failed; the slots stay empty.
    pub failed: Vec<RigError>,
    /// Loads still in flight.
    pub pending: usize,
}

/// Owns every camera device of the current rig, in load order.
///
/// Devices are keyed by `cam_id`. The registry also holds the options the rig
/// was loaded with and the queue of assets not yet attached.
#[derive(Debug, Default)]
pub struct RigRegistry {
    devices: Vec<CameraDevice>,
    index: HashMap<String, usize>,
    assets: AssetQueue,
    options: ViewerOptions,
}

impl RigRegistry {
    /// Creates an empty registry with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given options.
    pub fn with_options(options: ViewerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ViewerOptions) {
        self.options = options;
    }

    /// Registers a device.
    ///
    /// Returns an error if a device with the same id already exists.
    pub fn register(&mut self, device: CameraDevice) -> Result<()> {
        if self.index.contains_key(device.cam_id()) {
            return Err(RigError::DuplicateCamera(device.cam_id().to_string()));
        }
        self.index.insert(device.cam_id().to_string(), self.devices.len());
        self.devices.push(device);
        Ok(())
    }

    /// Queues loads for attachment by [`RigRegistry::poll_assets`].
    pub fn queue_assets(&mut self, assets: impl IntoIterator<Item = PendingAsset>) {
        for asset in assets {
            self.assets.push(asset);
        }
    }

    pub fn get(&self, cam_id: &str) -> Option<&CameraDevice> {
        self.index.get(cam_id).map(|&i| &self.devices[i])
    }

    pub fn get_mut(&mut self, cam_id: &str) -> Option<&mut CameraDevice> {
        self.index.get(cam_id).map(|&i| &mut self.devices[i])
    }

    pub fn contains(&self, cam_id: &str) -> bool {
        self.index.contains_key(cam_id)
    }

    /// Disposes and removes one device. Returns false if it was not found.
    pub fn remove(&mut self, cam_id: &str, renderer: &mut dyn Renderer) -> bool {
        let Some(i) = self.index.remove(cam_id) else {
            return false;
        };
        let mut device = self.devices.remove(i);
        device.dispose(renderer);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        self.assets.drop_cancelled();
        true
    }

    /// Disposes every device and empties the registry.
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        for device in &mut self.devices {
            device.dispose(renderer);
        }
        if !self.devices.is_empty() {
            log::info!("cleared {} cameras", self.devices.len());
        }
        self.devices.clear();
        self.index.clear();
        self.assets.drop_cancelled();
    }

    /// Returns the devices in load order.
    pub fn iter(&self) -> impl Iterator<Item = &CameraDevice> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CameraDevice> {
        self.devices.iter_mut()
    }

    /// Returns the camera ids in load order.
    pub fn cam_ids(&self) -> Vec<&str> {
        self.devices.iter().map(CameraDevice::cam_id).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns the number of loads not yet attached.
    pub fn num_pending_assets(&self) -> usize {
        self.assets.len()
    }

    /// Attaches every finished load to its device. Call once per frame.
    pub fn poll_assets(&mut self, renderer: &mut dyn Renderer) -> AssetPollSummary {
        let mut summary = AssetPollSummary::default();
        for finished in self.assets.poll_ready() {
            let outcome = match self.get_mut(&finished.cam_id) {
                Some(device) => device.apply_finished(finished, renderer),
                None => {
                    if let Ok(handle) = finished.result {
                        renderer.remove_object(handle);
                    }
                    AssetOutcome::Discarded
                }
            };
            match outcome {
                AssetOutcome::Attached(_) => summary.attached += 1,
                AssetOutcome::Discarded => summary.discarded += 1,
                AssetOutcome::Failed(err) => summary.failed.push(err),
            }
        }
        summary.pending = self.assets.len();
        summary
    }

    /// Returns the bounding box of the whole rig, or `None` when empty.
    pub fn extents(&self) -> Option<(DVec3, DVec3)> {
        self.devices
            .iter()
            .map(CameraDevice::bounding_box)
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscope_core::{Color, Intrinsics, Placement, ResolvedPose, ScaleFactors};
    use rigscope_render::HeadlessScene;
    use rigscope_structures::{CameraSpec, ImageInfo};

    fn spec(cam_id: &str, x: f64) -> CameraSpec {
        CameraSpec {
            cam_id: cam_id.to_string(),
            label: cam_id.to_string(),
            color: Color::GRAY,
            intrinsics: Intrinsics::new(600.0, 600.0, 320.0, 240.0),
            pose: ResolvedPose::from_placement(Placement::at(DVec3::new(x, 0.0, 0.0))),
            points_local: vec![DVec3::new(0.0, 0.0, 500.0); 21],
            image: ImageInfo {
                width: 640,
                height: 480,
                path: Some(format!("images/{cam_id}.png")),
            },
            scale: ScaleFactors::default(),
            model_path: Some("assets/camera.obj".to_string()),
        }
    }

    fn add(
        registry: &mut RigRegistry,
        scene: &mut HeadlessScene,
        cam_id: &str,
        x: f64,
    ) -> Result<()> {
        let (device, assets) = CameraDevice::build(spec(cam_id, x), scene, registry.options());
        registry.register(device)?;
        registry.queue_assets(assets);
        Ok(())
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut scene = HeadlessScene::new();
        let mut registry = RigRegistry::new();
        add(&mut registry, &mut scene, "a", 0.0).unwrap();
        let err = add(&mut registry, &mut scene, "a", 1.0).unwrap_err();
        assert!(matches!(err, RigError::DuplicateCamera(ref id) if id == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_keeps_lookup_consistent() {
        let mut scene = HeadlessScene::new();
        let mut registry = RigRegistry::new();
        for (id, x) in [("a", 0.0), ("b", 1.0), ("c", 2.0)] {
            add(&mut registry, &mut scene, id, x).unwrap();
        }
        let b_handles = registry.get("b").unwrap().handles();

        assert!(registry.remove("b", &mut scene));
        assert!(!registry.remove("b", &mut scene));
        assert_eq!(registry.cam_ids(), vec!["a", "c"]);
        assert_eq!(registry.get("c").unwrap().cam_id(), "c");
        assert!(!registry.contains("b"));
        assert!(b_handles.iter().all(|h| scene.object(*h).is_none()));
        assert_eq!(registry.num_pending_assets(), 4);
    }

    #[test]
    fn test_poll_attaches_finished_loads() {
        let mut scene = HeadlessScene::new();
        let mut registry = RigRegistry::new();
        add(&mut registry, &mut scene, "a", 0.0).unwrap();
        add(&mut registry, &mut scene, "b", 1.0).unwrap();

        let summary = registry.poll_assets(&mut scene);
        assert_eq!(summary.attached, 0);
        assert_eq!(summary.pending, 4);

        let ids: Vec<u64> = scene.pending_requests().map(|r| r.id).collect();
        for id in ids {
            assert!(scene.succeed_load(id).is_some());
        }
        let summary = registry.poll_assets(&mut scene);
        assert_eq!(summary.attached, 4);
        assert_eq!(summary.pending, 0);
        assert!(summary.failed.is_empty());
        assert!(registry.iter().all(CameraDevice::is_complete));
    }

    #[test]
    fn test_clear_abandons_pending_loads() {
        let mut scene = HeadlessScene::new();
        let mut registry = RigRegistry::new();
        add(&mut registry, &mut scene, "a", 0.0).unwrap();

        registry.clear(&mut scene);
        assert!(registry.is_empty());
        assert_eq!(registry.num_pending_assets(), 0);
        assert!(registry.extents().is_none());

        let ids: Vec<u64> = scene.pending_requests().map(|r| r.id).collect();
        for id in ids {
            assert!(scene.succeed_load(id).is_none());
        }
        assert_eq!(scene.num_objects(), 0);
    }

    #[test]
    fn test_extents_cover_every_camera() {
        let mut scene = HeadlessScene::new();
        let mut registry = RigRegistry::new();
        add(&mut registry, &mut scene, "a", -1.0).unwrap();
        add(&mut registry, &mut scene, "b", 2.0).unwrap();

        let (min, max) = registry.extents().unwrap();
        assert!(min.x <= -1.0);
        assert!(max.x >= 2.0);
    }
}
