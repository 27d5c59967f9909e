#![warn(missing_docs)]

//! Math types for functional homodonty measurements.
//!
//! Thin wrappers around nalgebra for the scene geometry the lever
//! pipeline works in: points, vectors, model-to-world transforms,
//! the Euclidean `distance` metric and tolerance constants.

use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point in 3D scene space (millimetres).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D scene space.
pub type Vec3 = Vector3<f64>;

/// Euclidean distance between two points.
///
/// Non-negative and symmetric; `distance(a, a) == 0.0`.
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    nalgebra::distance(a, b)
}

/// Whether every coordinate of `p` is finite.
pub fn is_finite_point(p: &Point3) -> bool {
    p.iter().all(|c| c.is_finite())
}

/// A 4x4 affine transformation matrix.
///
/// Serialized as four rows of four numbers, the layout a scene's
/// transform node hands out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 4]; 4]", into = "[[f64; 4]; 4]")]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

impl From<[[f64; 4]; 4]> for Transform {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self {
            matrix: Matrix4::from_fn(|r, c| rows[r][c]),
        }
    }
}

impl From<Transform> for [[f64; 4]; 4] {
    fn from(t: Transform) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = t.matrix[(r, c)];
            }
        }
        rows
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 mm).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
