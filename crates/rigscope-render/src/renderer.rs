//! The renderer interface consumed by camera devices.

use glam::{DVec2, DVec3};
use rigscope_core::{Color, Placement};

use crate::asset::AssetFuture;
use crate::handle::ObjectHandle;

/// Surface style of a loaded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub color: Color,
    pub opacity: f64,
    /// Draw an opaque wireframe over the translucent surface.
    pub wireframe: bool,
}

/// A scene graph that can create, place, show and remove objects.
///
/// `create_*` and `load_*` produce objects that are not yet in the scene;
/// [`Renderer::add_object`] inserts them. [`Renderer::remove_object`] takes an
/// object out of the scene and releases it, whether or not it was added.
/// Unknown handles are ignored.
pub trait Renderer {
    /// Inserts an object into the scene.
    fn add_object(&mut self, handle: ObjectHandle);

    /// Removes an object from the scene and releases it.
    fn remove_object(&mut self, handle: ObjectHandle);

    /// Shows or hides an object.
    fn set_visible(&mut self, handle: ObjectHandle, visible: bool);

    /// Moves and orients an object.
    fn set_transform(&mut self, handle: ObjectHandle, placement: Placement);

    /// Recolors an object.
    fn set_appearance(&mut self, handle: ObjectHandle, appearance: Appearance);

    /// Creates a keypoint marker at `position`.
    fn create_point_marker(&mut self, position: DVec3, color: Color, size: f64) -> ObjectHandle;

    /// Creates a line segment from `a` to `b`.
    fn create_line(&mut self, a: DVec3, b: DVec3, color: Color, opacity: f64) -> ObjectHandle;

    /// Moves both endpoints of a line created with [`Renderer::create_line`].
    fn set_line_endpoints(&mut self, handle: ObjectHandle, a: DVec3, b: DVec3);

    /// Creates a text label at `position`.
    fn create_text_label(&mut self, position: DVec3, text: &str, color: Color) -> ObjectHandle;

    /// Creates an axes indicator of the given length.
    fn create_axes(&mut self, size: f64) -> ObjectHandle;

    /// Creates a flat rectangle of `size` (width, height) in scene units.
    fn create_plane(&mut self, size: DVec2, color: Color, opacity: f64) -> ObjectHandle;

    /// Starts loading a 3D model.
    fn load_model(&mut self, path: &str) -> AssetFuture;

    /// Starts loading an image and mapping it onto a rectangle placed at
    /// `placement`, sized by `pixels_per_unit`.
    fn load_image_plane(
        &mut self,
        path: &str,
        placement: Placement,
        pixels_per_unit: f64,
        opacity: f64,
    ) -> AssetFuture;
}
