//! Toggleable visual layers of a camera.

use serde::{Deserialize, Serialize};

/// A group of visual elements that can be shown or hidden together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualLayer {
    /// The textured image.
    Image,
    /// The image-plane placeholder.
    Plane,
    /// Keypoint-to-camera projection rays.
    ProjectionLines,
    /// The camera's local axes indicator.
    Axes,
}

impl VisualLayer {
    /// All layers, in UI order.
    pub const ALL: [Self; 4] = [
        Self::Image,
        Self::Plane,
        Self::ProjectionLines,
        Self::Axes,
    ];

    /// Label shown next to the toggle.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Plane => "Plane",
            Self::ProjectionLines => "Projection lines",
            Self::Axes => "Axes",
        }
    }
}

impl std::fmt::Display for VisualLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Visibility flags for the four layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LayerVisibility {
    pub image: bool,
    pub plane: bool,
    pub projection_lines: bool,
    pub axes: bool,
}

impl LayerVisibility {
    /// Every layer visible.
    pub const ALL_VISIBLE: Self = Self {
        image: true,
        plane: true,
        projection_lines: true,
        axes: true,
    };

    /// Returns the flag for a layer.
    #[must_use]
    pub fn get(&self, layer: VisualLayer) -> bool {
        match layer {
            VisualLayer::Image => self.image,
            VisualLayer::Plane => self.plane,
            VisualLayer::ProjectionLines => self.projection_lines,
            VisualLayer::Axes => self.axes,
        }
    }

    /// Sets the flag for a layer.
    pub fn set(&mut self, layer: VisualLayer, visible: bool) {
        match layer {
            VisualLayer::Image => self.image = visible,
            VisualLayer::Plane => self.plane = visible,
            VisualLayer::ProjectionLines => self.projection_lines = visible,
            VisualLayer::Axes => self.axes = visible,
        }
    }
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self::ALL_VISIBLE
    }
}
