#![warn(missing_docs)]

//! Triangle surfaces for tooth segments.
//!
//! A tooth arrives as a model mesh that may sit under its own
//! model-to-world transform. Every distance and projection in the
//! lever pipeline must happen in one frame, so the only way to get a
//! queryable surface is through [`ModelSurface::resolve`] (or the
//! explicit [`TriangleMesh::assume_world`]), which yields a
//! [`WorldMesh`].
//!
//! # Example
//!
//! ```
//! use homodonty_math::{Point3, Transform};
//! use homodonty_mesh::{ModelSurface, TriangleMesh};
//!
//! let cube = TriangleMesh::axis_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
//! let surface = ModelSurface::new(cube).with_transform(Transform::translation(5.0, 0.0, 0.0));
//! let world = surface.resolve().unwrap();
//!
//! let p = world.closest_point(&Point3::new(10.0, 0.5, 0.5)).unwrap();
//! assert!((p.x - 6.0).abs() < 1e-12);
//! ```

mod error;
pub mod query;

pub use error::{MeshError, Result};
pub use query::{closest_point_on_segment, closest_point_on_triangle, closest_surface_point};

use homodonty_math::{Point3, Transform};
use serde::{Deserialize, Serialize};

/// Indexed triangle mesh with flat vertex and index buffers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]`.
    pub vertices: Vec<f64>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from vertex positions and triangle index triples.
    pub fn from_parts(points: &[Point3], faces: &[[u32; 3]]) -> Self {
        Self {
            vertices: points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
            indices: faces.iter().flatten().copied().collect(),
        }
    }

    /// Closed axis-aligned box spanning `min`..`max`, outward CCW winding.
    pub fn axis_box(min: Point3, max: Point3) -> Self {
        let points = [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];
        let faces = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self::from_parts(&points, &faces)
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        )
    }

    /// Iterate the corner positions of every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertex(tri[0] as usize),
                self.vertex(tri[1] as usize),
                self.vertex(tri[2] as usize),
            ]
        })
    }

    /// Check buffer shapes, index ranges and coordinate finiteness.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() % 3 != 0 {
            return Err(MeshError::MalformedVertices(self.vertices.len()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::MalformedIndices(self.indices.len()));
        }
        let vertex_count = self.num_vertices();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        if let Some(pos) = self.vertices.iter().position(|c| !c.is_finite()) {
            return Err(MeshError::NonFiniteVertex(pos / 3));
        }
        Ok(())
    }

    /// Total triangle area (mm² for millimetre coordinates).
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| 0.5 * (b - a).cross(&(c - a)).norm())
            .sum()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        if self.num_vertices() == 0 {
            return None;
        }
        let first = self.vertex(0);
        let (min, max) = (0..self.num_vertices()).map(|i| self.vertex(i)).fold(
            (first, first),
            |(min, max), p| (min.inf(&p), max.sup(&p)),
        );
        Some((min, max))
    }

    /// Apply `transform` to every vertex.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let points: Vec<Point3> = (0..self.num_vertices())
            .map(|i| transform.apply_point(&self.vertex(i)))
            .collect();
        Self {
            vertices: points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
            indices: self.indices.clone(),
        }
    }

    /// Declare that this mesh is already in scene coordinates.
    pub fn assume_world(self) -> Result<WorldMesh> {
        self.validate()?;
        Ok(WorldMesh(self))
    }
}

/// A model mesh plus its optional model-to-world transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSurface {
    /// Mesh in model coordinates.
    pub mesh: TriangleMesh,
    /// Parent transform, if the model is not already in world space.
    #[serde(default)]
    pub to_world: Option<Transform>,
}

impl ModelSurface {
    /// Wrap a mesh with no parent transform.
    pub fn new(mesh: TriangleMesh) -> Self {
        Self {
            mesh,
            to_world: None,
        }
    }

    /// Attach a model-to-world transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.to_world = Some(transform);
        self
    }

    /// Resolve the surface into scene coordinates.
    pub fn resolve(self) -> Result<WorldMesh> {
        match self.to_world {
            Some(transform) => self.mesh.transformed(&transform).assume_world(),
            None => self.mesh.assume_world(),
        }
    }
}

/// A validated triangle mesh whose vertices are in scene coordinates.
///
/// Only constructible through [`ModelSurface::resolve`] or
/// [`TriangleMesh::assume_world`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMesh(TriangleMesh);

impl WorldMesh {
    /// Borrow the underlying mesh.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.0
    }

    /// Nearest point on the surface to `query`.
    pub fn closest_point(&self, query: &Point3) -> Result<Point3> {
        closest_surface_point(self, query)
    }

    /// Total triangle area.
    pub fn surface_area(&self) -> f64 {
        self.0.surface_area()
    }
}
