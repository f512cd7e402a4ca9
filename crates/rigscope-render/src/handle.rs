//! Opaque handles to renderer objects.

/// Identifies one object owned by a renderer.
///
/// Handles are never reused within a renderer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    /// Wraps a raw id.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a renderer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A small sphere marking a keypoint.
    PointMarker,
    /// A straight segment between two points.
    Line,
    /// A text sprite.
    TextLabel,
    /// An XYZ axes indicator.
    Axes,
    /// A flat colored rectangle.
    Plane,
    /// A loaded 3D model.
    Model,
    /// A loaded image mapped onto a rectangle.
    ImagePlane,
}
