//! In-memory scene that implements [`Renderer`] without a GPU.
//!
//! Records every object with its kind, placement, visibility and geometry so
//! callers (tests, batch tools, the demo) can inspect exactly what a rig
//! produced. Asset requests are queued; they finish when the owner calls
//! [`HeadlessScene::complete_pending_loads`] (reads files from disk) or
//! resolves them one by one with [`HeadlessScene::succeed_load`] /
//! [`HeadlessScene::fail_load`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::{DVec2, DVec3};
use rigscope_core::keypoints::plane_size;
use rigscope_core::{Color, Placement};

use crate::asset::{asset_channel, AssetCompleter, AssetFuture};
use crate::error::{AssetError, AssetResult};
use crate::handle::{ObjectHandle, ObjectKind};
use crate::renderer::{Appearance, Renderer};

/// Everything the headless scene knows about one object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub placement: Placement,
    pub visible: bool,
    /// Whether the object has been added to the scene.
    pub in_scene: bool,
    pub color: Option<Color>,
    pub opacity: f64,
    /// Line endpoints, for [`ObjectKind::Line`].
    pub endpoints: Option<(DVec3, DVec3)>,
    /// Width and height in scene units, for planes, markers and axes.
    pub size: Option<DVec2>,
    /// Label text, for [`ObjectKind::TextLabel`].
    pub text: Option<String>,
    /// Source file, for loaded assets.
    pub source: Option<String>,
    /// Vertex count of a loaded model.
    pub vertex_count: usize,
    /// Whether a wireframe overlay is drawn.
    pub wireframe: bool,
}

impl SceneObject {
    fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            placement: Placement::IDENTITY,
            visible: true,
            in_scene: false,
            color: None,
            opacity: 1.0,
            endpoints: None,
            size: None,
            text: None,
            source: None,
            vertex_count: 0,
            wireframe: false,
        }
    }
}

/// Which renderer call produced a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    ImagePlane,
}

/// A queued asset load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub id: u64,
    pub kind: AssetKind,
    pub path: String,
    pub placement: Placement,
    pub pixels_per_unit: f64,
    pub opacity: f64,
}

struct PendingLoad {
    request: LoadRequest,
    completer: AssetCompleter,
}

/// What a file read produced for a request.
struct LoadedAsset {
    size: Option<DVec2>,
    vertex_count: usize,
}

/// A renderer that keeps its scene in memory.
#[derive(Default)]
pub struct HeadlessScene {
    objects: HashMap<ObjectHandle, SceneObject>,
    next_handle: u64,
    next_request: u64,
    pending: Vec<PendingLoad>,
    asset_root: Option<PathBuf>,
}

impl HeadlessScene {
    /// Creates an empty scene. Asset paths resolve against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scene that resolves relative asset paths against `root`.
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Returns an object by handle, whether or not it is in the scene.
    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    /// Returns the number of objects currently in the scene.
    pub fn num_objects(&self) -> usize {
        self.objects.values().filter(|o| o.in_scene).count()
    }

    /// Returns the number of live objects, including ones never added.
    pub fn num_allocated(&self) -> usize {
        self.objects.len()
    }

    /// Returns the in-scene objects of one kind.
    pub fn objects_of_kind(
        &self,
        kind: ObjectKind,
    ) -> impl Iterator<Item = (ObjectHandle, &SceneObject)> {
        self.objects
            .iter()
            .filter(move |(_, o)| o.in_scene && o.kind == kind)
            .map(|(h, o)| (*h, o))
    }

    /// Returns the queued asset requests, oldest first.
    pub fn pending_requests(&self) -> impl Iterator<Item = &LoadRequest> {
        self.pending.iter().map(|p| &p.request)
    }

    /// Returns the number of queued asset requests.
    pub fn num_pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Finishes one request successfully without touching the filesystem.
    ///
    /// Returns the delivered handle, or `None` if the request is unknown or
    /// nobody is waiting for it any more (the object is released then).
    pub fn succeed_load(&mut self, id: u64) -> Option<ObjectHandle> {
        let pending = self.take_pending(id)?;
        let loaded = LoadedAsset {
            size: None,
            vertex_count: 0,
        };
        self.deliver(pending, loaded)
    }

    /// Fails one request. Returns `false` if the request is unknown.
    pub fn fail_load(&mut self, id: u64, error: AssetError) -> bool {
        match self.take_pending(id) {
            Some(pending) => {
                pending.completer.complete(Err(error));
                true
            }
            None => false,
        }
    }

    /// Reads every queued asset from disk and delivers the results.
    ///
    /// Models are read as OBJ; images only need their dimensions. Returns the
    /// number of requests that were delivered successfully.
    pub fn complete_pending_loads(&mut self) -> usize {
        let mut delivered = 0;
        for pending in std::mem::take(&mut self.pending) {
            match self.read_asset(&pending.request) {
                Ok(loaded) => {
                    if self.deliver(pending, loaded).is_some() {
                        delivered += 1;
                    }
                }
                Err(err) => {
                    log::warn!("asset load failed: {err}");
                    pending.completer.complete(Err(err));
                }
            }
        }
        delivered
    }

    fn take_pending(&mut self, id: u64) -> Option<PendingLoad> {
        let idx = self.pending.iter().position(|p| p.request.id == id)?;
        Some(self.pending.remove(idx))
    }

    fn deliver(&mut self, pending: PendingLoad, loaded: LoadedAsset) -> Option<ObjectHandle> {
        let request = pending.request;
        let kind = match request.kind {
            AssetKind::Model => ObjectKind::Model,
            AssetKind::ImagePlane => ObjectKind::ImagePlane,
        };
        let handle = self.spawn(kind);
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.placement = request.placement;
            obj.opacity = request.opacity;
            obj.size = loaded.size;
            obj.vertex_count = loaded.vertex_count;
            obj.source = Some(request.path.clone());
        }

        if pending.completer.complete(Ok(handle)) {
            Some(handle)
        } else {
            log::debug!("load of '{}' no longer wanted, releasing {handle}", request.path);
            self.objects.remove(&handle);
            None
        }
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.asset_root {
            Some(root) if Path::new(path).is_relative() => root.join(path),
            _ => PathBuf::from(path),
        }
    }

    fn read_asset(&self, request: &LoadRequest) -> AssetResult<LoadedAsset> {
        let path = self.resolve_path(&request.path);
        match request.kind {
            AssetKind::Model => {
                let (models, _materials) = tobj::load_obj(&path, &tobj::GPU_LOAD_OPTIONS)
                    .map_err(|e| match e {
                        tobj::LoadError::OpenFileFailed => {
                            AssetError::NotFound(path.display().to_string())
                        }
                        other => AssetError::Decode {
                            path: path.display().to_string(),
                            reason: other.to_string(),
                        },
                    })?;
                let vertex_count = models.iter().map(|m| m.mesh.positions.len() / 3).sum();
                Ok(LoadedAsset {
                    size: None,
                    vertex_count,
                })
            }
            AssetKind::ImagePlane => {
                let (width, height) = image::image_dimensions(&path).map_err(|e| match e {
                    image::ImageError::IoError(_) => {
                        AssetError::NotFound(path.display().to_string())
                    }
                    other => AssetError::Decode {
                        path: path.display().to_string(),
                        reason: other.to_string(),
                    },
                })?;
                Ok(LoadedAsset {
                    size: Some(plane_size(width, height, request.pixels_per_unit)),
                    vertex_count: 0,
                })
            }
        }
    }

    fn spawn(&mut self, kind: ObjectKind) -> ObjectHandle {
        self.next_handle += 1;
        let handle = ObjectHandle::from_raw(self.next_handle);
        self.objects.insert(handle, SceneObject::new(kind));
        handle
    }

    fn spawn_with(
        &mut self,
        kind: ObjectKind,
        init: impl FnOnce(&mut SceneObject),
    ) -> ObjectHandle {
        let handle = self.spawn(kind);
        if let Some(obj) = self.objects.get_mut(&handle) {
            init(obj);
        }
        handle
    }

    fn request(
        &mut self,
        kind: AssetKind,
        path: &str,
        placement: Placement,
        ppu: f64,
        opacity: f64,
    ) -> AssetFuture {
        self.next_request += 1;
        let (completer, future) = asset_channel();
        self.pending.push(PendingLoad {
            request: LoadRequest {
                id: self.next_request,
                kind,
                path: path.to_string(),
                placement,
                pixels_per_unit: ppu,
                opacity,
            },
            completer,
        });
        future
    }
}

impl Renderer for HeadlessScene {
    fn add_object(&mut self, handle: ObjectHandle) {
        match self.objects.get_mut(&handle) {
            Some(obj) => obj.in_scene = true,
            None => log::warn!("add_object: unknown handle {handle}"),
        }
    }

    fn remove_object(&mut self, handle: ObjectHandle) {
        self.objects.remove(&handle);
    }

    fn set_visible(&mut self, handle: ObjectHandle, visible: bool) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.visible = visible;
        }
    }

    fn set_transform(&mut self, handle: ObjectHandle, placement: Placement) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.placement = placement;
        }
    }

    fn set_appearance(&mut self, handle: ObjectHandle, appearance: Appearance) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.color = Some(appearance.color);
            obj.opacity = appearance.opacity;
            obj.wireframe = appearance.wireframe;
        }
    }

    fn create_point_marker(&mut self, position: DVec3, color: Color, size: f64) -> ObjectHandle {
        self.spawn_with(ObjectKind::PointMarker, |o| {
            o.placement = Placement::at(position);
            o.color = Some(color);
            o.size = Some(DVec2::splat(size));
        })
    }

    fn create_line(&mut self, a: DVec3, b: DVec3, color: Color, opacity: f64) -> ObjectHandle {
        self.spawn_with(ObjectKind::Line, |o| {
            o.endpoints = Some((a, b));
            o.color = Some(color);
            o.opacity = opacity;
        })
    }

    fn set_line_endpoints(&mut self, handle: ObjectHandle, a: DVec3, b: DVec3) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.endpoints = Some((a, b));
        }
    }

    fn create_text_label(&mut self, position: DVec3, text: &str, color: Color) -> ObjectHandle {
        self.spawn_with(ObjectKind::TextLabel, |o| {
            o.placement = Placement::at(position);
            o.text = Some(text.to_string());
            o.color = Some(color);
        })
    }

    fn create_axes(&mut self, size: f64) -> ObjectHandle {
        self.spawn_with(ObjectKind::Axes, |o| o.size = Some(DVec2::splat(size)))
    }

    fn create_plane(&mut self, size: DVec2, color: Color, opacity: f64) -> ObjectHandle {
        self.spawn_with(ObjectKind::Plane, |o| {
            o.size = Some(size);
            o.color = Some(color);
            o.opacity = opacity;
        })
    }

    fn load_model(&mut self, path: &str) -> AssetFuture {
        self.request(AssetKind::Model, path, Placement::IDENTITY, 1.0, 1.0)
    }

    fn load_image_plane(
        &mut self,
        path: &str,
        placement: Placement,
        pixels_per_unit: f64,
        opacity: f64,
    ) -> AssetFuture {
        self.request(AssetKind::ImagePlane, path, placement, pixels_per_unit, opacity)
    }
}
