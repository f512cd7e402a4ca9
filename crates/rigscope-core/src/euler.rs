//! Intrinsic XYZ Euler angles and 4x4 rigid transform decomposition.
//!
//! Every rotation in rigscope is stored as [`EulerXyz`]: rotate about X, then
//! the rotated Y, then the twice-rotated Z, so the matrix is
//! `R = Rx(x) * Ry(y) * Rz(z)`. No other order is used anywhere; decomposition
//! and composition below are exact inverses of each other on the principal
//! range `x, z in (-pi, pi]`, `y in [-pi/2, pi/2]`.

use glam::{DMat3, DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Below this value of `cos(y)` the decomposition is treated as gimbal-locked.
pub const SINGULARITY_EPSILON: f64 = 1e-6;

/// A rotation as intrinsic X-Y-Z Euler angles, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerXyz {
    /// Rotation about the X axis (applied first).
    pub x: f64,
    /// Rotation about the rotated Y axis.
    pub y: f64,
    /// Rotation about the twice-rotated Z axis.
    pub z: f64,
}

impl EulerXyz {
    /// No rotation.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates angles from radians.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates angles from a vector of degrees (the UI-facing unit).
    #[must_use]
    pub fn from_degrees(degrees: DVec3) -> Self {
        Self::new(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        )
    }

    /// Returns the angles in degrees.
    #[must_use]
    pub fn to_degrees(self) -> DVec3 {
        DVec3::new(self.x.to_degrees(), self.y.to_degrees(), self.z.to_degrees())
    }

    /// Returns the angles (radians) as a vector.
    #[must_use]
    pub fn as_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Returns true if all three angles are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.as_dvec3().is_finite()
    }

    /// Builds the rotation matrix `Rx * Ry * Rz`.
    #[must_use]
    pub fn to_matrix(self) -> DMat3 {
        DMat3::from_rotation_x(self.x)
            * DMat3::from_rotation_y(self.y)
            * DMat3::from_rotation_z(self.z)
    }

    /// Extracts intrinsic XYZ angles from a rotation matrix.
    ///
    /// Near gimbal lock (`cos(y) < SINGULARITY_EPSILON`) the X and Z rotations
    /// share an axis; `z` is pinned to zero and the combined angle goes to `x`.
    /// This loses the split between the two but never produces NaN.
    #[must_use]
    pub fn from_matrix(m: &DMat3) -> Self {
        let r00 = at(m, 0, 0);
        let r01 = at(m, 0, 1);
        let r02 = at(m, 0, 2).clamp(-1.0, 1.0);
        let cos_y = r00.hypot(r01);
        let y = r02.atan2(cos_y);

        if cos_y < SINGULARITY_EPSILON {
            let x = at(m, 2, 1).atan2(at(m, 1, 1));
            Self::new(x, y, 0.0)
        } else {
            let x = (-at(m, 1, 2)).atan2(at(m, 2, 2));
            let z = (-r01).atan2(r00);
            Self::new(x, y, z)
        }
    }

    /// Rotates a vector by these angles.
    #[must_use]
    pub fn rotate(self, v: DVec3) -> DVec3 {
        self.to_matrix() * v
    }
}

/// Element at `(row, col)`; glam stores matrices column-major.
fn at(m: &DMat3, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

/// Builds a 4x4 matrix from row-major rows, as datasets write them.
#[must_use]
pub fn matrix_from_rows(rows: &[[f64; 4]; 4]) -> DMat4 {
    DMat4::from_cols_array_2d(rows).transpose()
}

/// Splits a rigid transform into translation and XYZ rotation.
#[must_use]
pub fn decompose(m: &DMat4) -> (DVec3, EulerXyz) {
    let translation = m.w_axis.truncate();
    let rotation = EulerXyz::from_matrix(&DMat3::from_mat4(*m));
    (translation, rotation)
}

/// Builds a rigid transform from translation and XYZ rotation.
#[must_use]
pub fn compose(translation: DVec3, rotation: EulerXyz) -> DMat4 {
    let mut m = DMat4::from_mat3(rotation.to_matrix());
    m.w_axis = translation.extend(1.0);
    m
}

/// Inverts a rigid transform (`[R | t]` becomes `[R^T | -R^T t]`).
///
/// Only meaningful for rigid input; the rotation block is transposed rather
/// than inverted.
#[must_use]
pub fn rigid_inverse(m: &DMat4) -> DMat4 {
    let rotation_t = DMat3::from_mat4(*m).transpose();
    let translation = -(rotation_t * m.w_axis.truncate());
    let mut inv = DMat4::from_mat3(rotation_t);
    inv.w_axis = translation.extend(1.0);
    inv
}

/// How far a 4x4 matrix is from a rigid transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidityCheck {
    /// Largest absolute entry of `R^T R - I`.
    pub orthonormal_error: f64,
    /// Determinant of the rotation block.
    pub determinant: f64,
    /// Largest absolute deviation of the bottom row from `[0, 0, 0, 1]`.
    pub bottom_row_error: f64,
}

impl RigidityCheck {
    /// Measures `m`.
    #[must_use]
    pub fn measure(m: &DMat4) -> Self {
        let rotation = DMat3::from_mat4(*m);
        let gram = rotation.transpose() * rotation - DMat3::IDENTITY;
        let orthonormal_error = gram
            .to_cols_array()
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let bottom = m.row(3) - glam::DVec4::W;
        let bottom_row_error = bottom.abs().max_element();

        Self {
            orthonormal_error,
            determinant: rotation.determinant(),
            bottom_row_error,
        }
    }

    /// Returns the largest of the three deviations.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.orthonormal_error
            .max((self.determinant - 1.0).abs())
            .max(self.bottom_row_error)
    }

    /// Returns true if every deviation is within `tolerance`.
    #[must_use]
    pub fn is_rigid(&self, tolerance: f64) -> bool {
        self.max_error() <= tolerance
    }
}
