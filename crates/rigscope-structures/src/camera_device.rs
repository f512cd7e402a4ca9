//! The camera device aggregate: one camera's pose and every visual derived from it.

use glam::{DVec2, DVec3};
use rigscope_core::keypoints::{image_plane_pose, plane_size, project_keypoints, skeleton_edges};
use rigscope_core::{
    project_to_image, Color, EulerXyz, Intrinsics, KeypointPolicy, LayerVisibility, Placement,
    ResolvedPose, RigError, ScaleFactors, ViewerOptions, VisualLayer,
};
use rigscope_render::{Appearance, AssetResult, ObjectHandle, Renderer};

use crate::asset::{AssetOutcome, AssetSlot, CancelToken, FinishedAsset, PendingAsset};

/// Image dimensions and optional texture path of a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub path: Option<String>,
}

/// Everything needed to build a [`CameraDevice`].
#[derive(Debug, Clone)]
pub struct CameraSpec {
    pub cam_id: String,
    pub label: String,
    pub color: Color,
    pub intrinsics: Intrinsics,
    pub pose: ResolvedPose,
    /// Keypoints in camera-local dataset units.
    pub points_local: Vec<DVec3>,
    pub image: ImageInfo,
    pub scale: ScaleFactors,
    /// Camera body model; `None` skips the model.
    pub model_path: Option<String>,
}

/// Intrinsics plus the single mutable pose of a camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraParams {
    pub intrinsics: Intrinsics,
    pub extrinsics: ResolvedPose,
}

/// One skeleton edge line and the joints it connects.
#[derive(Debug, Clone, Copy)]
struct EdgeLine {
    handle: ObjectHandle,
    joints: [usize; 2],
}

/// A camera of the rig with all of its visual elements.
///
/// Every visual is derived from `params.extrinsics` and is repositioned by
/// [`CameraDevice::set_pose`], the only way the pose changes. Model and image
/// arrive asynchronously through [`CameraDevice::attach_asset`].
#[derive(Debug)]
pub struct CameraDevice {
    cam_id: String,
    label: String,
    color: Color,
    params: CameraParams,
    points_local: Vec<DVec3>,
    points_world: Vec<DVec3>,
    image_info: ImageInfo,
    scale: ScaleFactors,
    visibility: LayerVisibility,
    model_appearance: Appearance,

    // Visual handles
    model: Option<ObjectHandle>,
    axes: ObjectHandle,
    label_handle: ObjectHandle,
    markers: Vec<ObjectHandle>,
    edges: Vec<EdgeLine>,
    rays: Vec<ObjectHandle>,
    plane: ObjectHandle,
    image: Option<ObjectHandle>,

    token: CancelToken,
    expects_model: bool,
    expects_image: bool,
    disposed: bool,
}

impl CameraDevice {
    /// Builds a device and creates its synchronous visuals in the renderer.
    ///
    /// Returns the device plus the model and image loads it requested. The
    /// device is usable immediately; the loads are attached later.
    pub fn build(
        spec: CameraSpec,
        renderer: &mut dyn Renderer,
        options: &ViewerOptions,
    ) -> (Self, Vec<PendingAsset>) {
        let CameraSpec {
            cam_id,
            label,
            color,
            intrinsics,
            pose,
            points_local,
            image: image_info,
            scale,
            model_path,
        } = spec;

        let placement = pose.placement();
        let points_world = project_keypoints(&points_local, &pose, scale.points_scale);
        let plane_pose = image_plane_pose(&placement, intrinsics.fx, scale.focal_scale);
        let visibility = options.initial_visibility;

        let axes = renderer.create_axes(options.axes_size);
        renderer.set_transform(axes, placement);
        renderer.set_visible(axes, visibility.axes);
        renderer.add_object(axes);

        let label_handle = renderer.create_text_label(placement.translation, &label, color);
        renderer.add_object(label_handle);

        let markers: Vec<ObjectHandle> = points_world
            .iter()
            .map(|p| {
                let h = renderer.create_point_marker(*p, color, options.marker_size);
                renderer.add_object(h);
                h
            })
            .collect();

        let edges: Vec<EdgeLine> = skeleton_edges(points_world.len())
            .iter()
            .map(|&[a, b]| {
                let handle = renderer.create_line(points_world[a], points_world[b], color, 1.0);
                renderer.add_object(handle);
                EdgeLine {
                    handle,
                    joints: [a, b],
                }
            })
            .collect();

        let rays: Vec<ObjectHandle> = points_world
            .iter()
            .map(|p| {
                let h = renderer.create_line(placement.translation, *p, color, options.ray_opacity);
                renderer.set_visible(h, visibility.projection_lines);
                renderer.add_object(h);
                h
            })
            .collect();

        let size = plane_size(image_info.width, image_info.height, options.pixels_per_unit);
        let plane = renderer.create_plane(size, color, options.plane_opacity);
        renderer.set_transform(plane, plane_pose);
        renderer.set_visible(plane, visibility.plane);
        renderer.add_object(plane);

        let token = CancelToken::new();
        let mut pending = Vec::new();
        if let Some(path) = &model_path {
            let future = renderer.load_model(path);
            pending.push(PendingAsset::new(
                cam_id.clone(),
                AssetSlot::Model,
                token.clone(),
                future,
            ));
        }
        if let Some(path) = &image_info.path {
            let future = renderer.load_image_plane(
                path,
                plane_pose,
                options.pixels_per_unit,
                options.image_opacity,
            );
            pending.push(PendingAsset::new(
                cam_id.clone(),
                AssetSlot::Image,
                token.clone(),
                future,
            ));
        }

        log::debug!(
            "built camera '{cam_id}': {} keypoints, {} edges, {} pending assets",
            markers.len(),
            edges.len(),
            pending.len()
        );

        let device = Self {
            cam_id,
            label,
            color,
            params: CameraParams {
                intrinsics,
                extrinsics: pose,
            },
            points_local,
            points_world,
            expects_model: model_path.is_some(),
            expects_image: image_info.path.is_some(),
            image_info,
            scale,
            visibility,
            model_appearance: Appearance {
                color,
                opacity: options.model_opacity,
                wireframe: options.model_wireframe,
            },
            model: None,
            axes,
            label_handle,
            markers,
            edges,
            rays,
            plane,
            image: None,
            token,
            disposed: false,
        };
        (device, pending)
    }

    /// Returns the camera id.
    pub fn cam_id(&self) -> &str {
        &self.cam_id
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the display color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the intrinsics and pose.
    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    /// Returns the live pose.
    pub fn current_pose(&self) -> Placement {
        self.params.extrinsics.placement()
    }

    /// Returns the keypoints in camera-local dataset units.
    pub fn points_local(&self) -> &[DVec3] {
        &self.points_local
    }

    /// Returns the keypoints' current world positions.
    pub fn points_world(&self) -> &[DVec3] {
        &self.points_world
    }

    pub fn image_info(&self) -> &ImageInfo {
        &self.image_info
    }

    pub fn scale(&self) -> &ScaleFactors {
        &self.scale
    }

    /// Returns the layer visibility flags.
    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    /// Returns the current image-plane placement.
    pub fn plane_pose(&self) -> Placement {
        image_plane_pose(
            &self.current_pose(),
            self.params.intrinsics.fx,
            self.scale.focal_scale,
        )
    }

    pub fn model_handle(&self) -> Option<ObjectHandle> {
        self.model
    }

    pub fn axes_handle(&self) -> ObjectHandle {
        self.axes
    }

    pub fn label_handle(&self) -> ObjectHandle {
        self.label_handle
    }

    pub fn marker_handles(&self) -> &[ObjectHandle] {
        &self.markers
    }

    /// Returns the skeleton line handles with the joints each connects.
    pub fn edge_handles(&self) -> impl Iterator<Item = (ObjectHandle, [usize; 2])> + '_ {
        self.edges.iter().map(|e| (e.handle, e.joints))
    }

    /// Returns one projection ray per keypoint, in keypoint order.
    pub fn ray_handles(&self) -> &[ObjectHandle] {
        &self.rays
    }

    pub fn plane_handle(&self) -> ObjectHandle {
        self.plane
    }

    pub fn image_handle(&self) -> Option<ObjectHandle> {
        self.image
    }

    /// Returns the token shared with this device's pending loads.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.token
    }

    /// Returns every handle the device currently owns.
    pub fn handles(&self) -> Vec<ObjectHandle> {
        if self.disposed {
            return Vec::new();
        }
        let mut all = vec![self.axes, self.label_handle, self.plane];
        all.extend(self.model);
        all.extend(self.image);
        all.extend(&self.markers);
        all.extend(self.edges.iter().map(|e| e.handle));
        all.extend(&self.rays);
        all
    }

    /// Returns true once every requested asset has been attached.
    pub fn is_complete(&self) -> bool {
        (!self.expects_model || self.model.is_some())
            && (!self.expects_image || self.image.is_some())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Moves the camera and every visual that depends on it.
    ///
    /// Model, axes and label follow the new pose; the plane and image are
    /// re-placed in front of it; each ray's camera end moves to the new
    /// center. Keypoint visuals move only under
    /// [`KeypointPolicy::FollowCamera`]. Non-finite input is ignored and
    /// `false` is returned.
    pub fn set_pose(
        &mut self,
        translation: DVec3,
        rotation: EulerXyz,
        renderer: &mut dyn Renderer,
        policy: KeypointPolicy,
    ) -> bool {
        let placement = Placement::new(translation, rotation);
        if !placement.is_finite() {
            log::warn!("ignoring non-finite pose for camera '{}'", self.cam_id);
            return false;
        }
        if self.disposed {
            log::warn!("set_pose on disposed camera '{}'", self.cam_id);
            return false;
        }

        self.params.extrinsics.set_placement(placement);

        if let Some(model) = self.model {
            renderer.set_transform(model, placement);
        }
        renderer.set_transform(self.axes, placement);
        renderer.set_transform(self.label_handle, Placement::at(translation));

        let plane_pose = self.plane_pose();
        renderer.set_transform(self.plane, plane_pose);
        if let Some(image) = self.image {
            renderer.set_transform(image, plane_pose);
        }

        if policy == KeypointPolicy::FollowCamera {
            self.points_world = project_keypoints(
                &self.points_local,
                &self.params.extrinsics,
                self.scale.points_scale,
            );
            for (marker, p) in self.markers.iter().zip(&self.points_world) {
                renderer.set_transform(*marker, Placement::at(*p));
            }
            for edge in &self.edges {
                let [a, b] = edge.joints;
                renderer.set_line_endpoints(
                    edge.handle,
                    self.points_world[a],
                    self.points_world[b],
                );
            }
        }

        for (ray, p) in self.rays.iter().zip(&self.points_world) {
            renderer.set_line_endpoints(*ray, translation, *p);
        }
        true
    }

    /// Applies a finished model or image load.
    ///
    /// The result is attached only if `token` is this device's token and is
    /// still live; otherwise any delivered object is released without being
    /// added. A failed load leaves the slot empty.
    pub fn attach_asset(
        &mut self,
        slot: AssetSlot,
        result: AssetResult<ObjectHandle>,
        token: &CancelToken,
        renderer: &mut dyn Renderer,
    ) -> AssetOutcome {
        if self.disposed || token.is_cancelled() || !token.same_as(&self.token) {
            if let Ok(handle) = result {
                renderer.remove_object(handle);
            }
            log::debug!("discarding late {slot} for camera '{}'", self.cam_id);
            return AssetOutcome::Discarded;
        }

        let handle = match result {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("camera '{}': {slot} failed to load: {err}", self.cam_id);
                return AssetOutcome::Failed(RigError::Asset {
                    cam_id: self.cam_id.clone(),
                    slot: slot.to_string(),
                    reason: err.to_string(),
                });
            }
        };

        let (placement, visible) = match slot {
            AssetSlot::Model => (self.current_pose(), true),
            AssetSlot::Image => (self.plane_pose(), self.visibility.image),
        };
        let previous = match slot {
            AssetSlot::Model => self.model.replace(handle),
            AssetSlot::Image => self.image.replace(handle),
        };
        if let Some(old) = previous {
            renderer.remove_object(old);
        }

        if slot == AssetSlot::Model {
            renderer.set_appearance(handle, self.model_appearance);
        }
        renderer.set_transform(handle, placement);
        renderer.set_visible(handle, visible);
        renderer.add_object(handle);
        AssetOutcome::Attached(handle)
    }

    /// Applies a [`FinishedAsset`] produced by [`PendingAsset::resolve`].
    pub fn apply_finished(
        &mut self,
        finished: FinishedAsset,
        renderer: &mut dyn Renderer,
    ) -> AssetOutcome {
        self.attach_asset(finished.slot, finished.result, &finished.token, renderer)
    }

    /// Shows or hides one layer.
    pub fn set_layer_visible(
        &mut self,
        layer: VisualLayer,
        visible: bool,
        renderer: &mut dyn Renderer,
    ) {
        self.visibility.set(layer, visible);
        match layer {
            VisualLayer::Image => {
                if let Some(image) = self.image {
                    renderer.set_visible(image, visible);
                }
            }
            VisualLayer::Plane => renderer.set_visible(self.plane, visible),
            VisualLayer::ProjectionLines => {
                for ray in &self.rays {
                    renderer.set_visible(*ray, visible);
                }
            }
            VisualLayer::Axes => renderer.set_visible(self.axes, visible),
        }
    }

    /// Cancels pending loads and removes every owned object from the renderer.
    ///
    /// Calling it twice is harmless.
    pub fn dispose(&mut self, renderer: &mut dyn Renderer) {
        if self.disposed {
            return;
        }
        self.token.cancel();
        for handle in self.handles() {
            renderer.remove_object(handle);
        }
        self.model = None;
        self.image = None;
        self.markers.clear();
        self.edges.clear();
        self.rays.clear();
        self.disposed = true;
        log::debug!("disposed camera '{}'", self.cam_id);
    }

    /// Returns the axis-aligned bounds of the camera center, the plane center
    /// and the world keypoints.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let center = self.current_pose().translation;
        let plane = self.plane_pose().translation;
        let mut min = center.min(plane);
        let mut max = center.max(plane);
        for p in &self.points_world {
            min = min.min(*p);
            max = max.max(*p);
        }
        (min, max)
    }

    /// Projects the world keypoints back into this camera's image.
    ///
    /// Entries are `None` for points behind the camera. Keypoints are
    /// converted back to dataset units first, so the result is in pixels of
    /// the original image.
    pub fn reprojection(&self) -> Vec<Option<DVec2>> {
        let pose = self.current_pose();
        let inv_points = if self.scale.points_scale.abs() > f64::EPSILON {
            1.0 / self.scale.points_scale
        } else {
            1.0
        };
        self.points_world
            .iter()
            .map(|p| {
                let local = pose.inverse_transform_point(*p) * inv_points;
                project_to_image(local, &Placement::IDENTITY, &self.params.intrinsics)
            })
            .collect()
    }
}
