//! Camera parameters and pose resolution.
//!
//! Raw extrinsics arrive as a row-major 4x4 matrix in dataset units (usually
//! millimeters). [`resolve`] turns that into a [`ResolvedPose`] in scene units:
//! translation scaled by `trans_scale`, rotation as [`EulerXyz`] (never scaled).

use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::euler::{decompose, matrix_from_rows, rigid_inverse, EulerXyz, RigidityCheck};

/// Pinhole intrinsics in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    /// Focal length along x.
    pub fx: f64,
    /// Focal length along y.
    pub fy: f64,
    /// Principal point x.
    pub cx: f64,
    /// Principal point y.
    pub cy: f64,
}

impl Intrinsics {
    /// Creates new intrinsics.
    #[must_use]
    pub const fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Parses the `[fx, fy, cx, cy]` layout used by datasets.
    ///
    /// Returns `None` unless there are exactly four finite values.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [fx, fy, cx, cy] if values.iter().all(|v| v.is_finite()) => {
                Some(Self::new(*fx, *fy, *cx, *cy))
            }
            _ => None,
        }
    }

    /// Returns `[fx, fy, cx, cy]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.fx, self.fy, self.cx, self.cy]
    }
}

/// Independent unit-conversion multipliers for one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleFactors {
    /// Applied to the extrinsics translation.
    pub trans_scale: f64,
    /// Applied to camera-local keypoints before they are rotated into the world.
    pub points_scale: f64,
    /// Applied to `fx` when placing the image plane.
    pub focal_scale: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            trans_scale: 1.0,
            points_scale: 1.0,
            focal_scale: 0.001,
        }
    }
}

/// Which way the dataset's extrinsics matrix maps points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExtrinsicsConvention {
    /// Camera-local points map into the world; the translation column is the
    /// camera center.
    #[default]
    CameraToWorld,
    /// World points map into the camera; the rigid inverse is taken first.
    WorldToCamera,
}

/// A position plus XYZ orientation. Used for live camera poses, image planes,
/// and renderer object transforms.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    /// Position in scene units.
    pub translation: DVec3,
    /// Orientation.
    pub rotation: EulerXyz,
}

impl Placement {
    /// Identity placement at the origin.
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: EulerXyz::ZERO,
    };

    /// Creates a placement.
    #[must_use]
    pub const fn new(translation: DVec3, rotation: EulerXyz) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// A placement with no rotation.
    #[must_use]
    pub const fn at(translation: DVec3) -> Self {
        Self::new(translation, EulerXyz::ZERO)
    }

    /// Maps a local point into the world: rotate, then translate.
    #[must_use]
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.rotation.rotate(local) + self.translation
    }

    /// Maps a world point into this frame.
    #[must_use]
    pub fn inverse_transform_point(&self, world: DVec3) -> DVec3 {
        self.rotation.to_matrix().transpose() * (world - self.translation)
    }

    /// Returns true if translation and rotation are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite()
    }

    /// Returns the equivalent 4x4 matrix.
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        crate::euler::compose(self.translation, self.rotation)
    }
}

/// A camera's pose in scene units.
///
/// `translation` and `rotation` are the live state. `matrix` is the snapshot
/// the pose was resolved from and goes stale after the first edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPose {
    /// Camera center in scene units.
    pub translation: DVec3,
    /// Camera orientation.
    pub rotation: EulerXyz,
    matrix: DMat4,
    edited: bool,
}

impl ResolvedPose {
    /// Creates a pose directly from a placement (the matrix is composed from it).
    #[must_use]
    pub fn from_placement(placement: Placement) -> Self {
        Self {
            translation: placement.translation,
            rotation: placement.rotation,
            matrix: placement.to_matrix(),
            edited: false,
        }
    }

    /// Returns the live translation and rotation.
    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement::new(self.translation, self.rotation)
    }

    /// Replaces the live translation and rotation.
    ///
    /// The source matrix is no longer available afterwards.
    pub fn set_placement(&mut self, placement: Placement) {
        self.translation = placement.translation;
        self.rotation = placement.rotation;
        self.edited = true;
    }

    /// The matrix this pose was resolved from, in dataset units.
    ///
    /// Returns `None` once the pose has been edited.
    #[must_use]
    pub fn source_matrix(&self) -> Option<&DMat4> {
        (!self.edited).then_some(&self.matrix)
    }
}

/// The result of [`resolve`]: the pose plus how rigid the input was.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    /// The resolved pose.
    pub pose: ResolvedPose,
    /// Rigidity measurement of the input matrix.
    pub rigidity: RigidityCheck,
    /// Whether the rigidity check passed the requested tolerance.
    pub is_rigid: bool,
}

/// Resolves a row-major extrinsics matrix into a scene-space pose.
///
/// Non-rigid input is not rejected: the pose is decomposed best-effort and
/// `is_rigid` is false so the caller can report it.
#[must_use]
pub fn resolve(
    rows: &[[f64; 4]; 4],
    convention: ExtrinsicsConvention,
    scale: &ScaleFactors,
    rigid_tolerance: f64,
) -> Resolution {
    let raw = matrix_from_rows(rows);
    let rigidity = RigidityCheck::measure(&raw);
    let matrix = match convention {
        ExtrinsicsConvention::CameraToWorld => raw,
        ExtrinsicsConvention::WorldToCamera => rigid_inverse(&raw),
    };

    let (translation, rotation) = decompose(&matrix);
    Resolution {
        pose: ResolvedPose {
            translation: translation * scale.trans_scale,
            rotation,
            matrix,
            edited: false,
        },
        rigidity,
        is_rigid: rigidity.is_rigid(rigid_tolerance),
    }
}

/// Projects a world point to pixel coordinates through a pinhole camera.
///
/// `camera` is the camera-to-world placement. Returns `None` for points on or
/// behind the image plane.
#[must_use]
pub fn project_to_image(
    world: DVec3,
    camera: &Placement,
    intrinsics: &Intrinsics,
) -> Option<DVec2> {
    let local = camera.inverse_transform_point(world);
    if local.z <= f64::EPSILON {
        return None;
    }
    Some(DVec2::new(
        local.x / local.z * intrinsics.fx + intrinsics.cx,
        local.y / local.z * intrinsics.fy + intrinsics.cy,
    ))
}
