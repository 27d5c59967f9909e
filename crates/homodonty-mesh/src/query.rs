//! Closest-point queries against triangle surfaces.
//!
//! The surface query walks every triangle; tooth meshes are small enough
//! that an acceleration structure buys nothing.

use homodonty_math::{Point3, Vec3};

use crate::error::{MeshError, Result};
use crate::WorldMesh;

/// Triangles with a doubled area below this are treated as segments.
const DEGENERATE_AREA: f64 = 1e-18;

/// Closest point on segment `a`-`b` to `point`.
pub fn closest_point_on_segment(point: &Point3, a: &Point3, b: &Point3) -> Point3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return *a;
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest point on triangle `v0`,`v1`,`v2` to `point`.
///
/// Voronoi-region walk from Ericson, "Real-Time Collision Detection".
/// The result may lie on a vertex, an edge or the face interior.
pub fn closest_point_on_triangle(point: &Point3, v0: &Point3, v1: &Point3, v2: &Point3) -> Point3 {
    let ab = v1 - v0;
    let ac = v2 - v0;

    if ab.cross(&ac).norm_squared() < DEGENERATE_AREA {
        return closest_on_edges(point, v0, v1, v2);
    }

    let ap = point - v0;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *v0;
    }

    let bp = point - v1;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *v1;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return v0 + ab * v;
    }

    let cp = point - v2;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *v2;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return v0 + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return v1 + (v2 - v1) * w;
    }

    // Face interior
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    v0 + ab * v + ac * w
}

fn closest_on_edges(point: &Point3, v0: &Point3, v1: &Point3, v2: &Point3) -> Point3 {
    [(v0, v1), (v1, v2), (v2, v0)]
        .into_iter()
        .map(|(a, b)| closest_point_on_segment(point, a, b))
        .min_by(|p, q| {
            let dp: Vec3 = p - point;
            let dq: Vec3 = q - point;
            dp.norm_squared().total_cmp(&dq.norm_squared())
        })
        .unwrap_or(*v0)
}

/// Nearest point on the surface of `mesh` to `query`.
///
/// Works for open and closed meshes alike: only the unsigned distance
/// to each face matters. Ties keep the first face in index order.
pub fn closest_surface_point(mesh: &WorldMesh, query: &Point3) -> Result<Point3> {
    let mut best: Option<(f64, Point3)> = None;
    for [a, b, c] in mesh.mesh().triangles() {
        let candidate = closest_point_on_triangle(query, &a, &b, &c);
        let d2 = (candidate - query).norm_squared();
        match best {
            Some((best_d2, _)) if best_d2 <= d2 => {}
            _ => best = Some((d2, candidate)),
        }
    }
    best.map(|(_, p)| p).ok_or(MeshError::NoFaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriangleMesh;
    use approx::assert_relative_eq;

    fn unit_triangle() -> [Point3; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn cube(size: f64) -> WorldMesh {
        TriangleMesh::axis_box(Point3::origin(), Point3::new(size, size, size))
            .assume_world()
            .unwrap()
    }

    #[test]
    fn test_triangle_face_interior() {
        let [a, b, c] = unit_triangle();
        let p = closest_point_on_triangle(&Point3::new(0.25, 0.25, 3.0), &a, &b, &c);
        assert_relative_eq!(p, Point3::new(0.25, 0.25, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_vertex_region() {
        let [a, b, c] = unit_triangle();
        let p = closest_point_on_triangle(&Point3::new(-1.0, -1.0, 0.5), &a, &b, &c);
        assert_relative_eq!(p, a, epsilon = 1e-12);
        let p = closest_point_on_triangle(&Point3::new(3.0, -0.5, 0.0), &a, &b, &c);
        assert_relative_eq!(p, b, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_hypotenuse_edge() {
        let [a, b, c] = unit_triangle();
        let p = closest_point_on_triangle(&Point3::new(1.0, 1.0, 0.0), &a, &b, &c);
        assert_relative_eq!(p, Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_triangle_uses_edges() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        let p = closest_point_on_triangle(&Point3::new(1.5, 1.0, 0.0), &a, &b, &c);
        assert!(p.iter().all(|v| v.is_finite()));
        assert_relative_eq!(p, Point3::new(1.5, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_segment_clamps() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(closest_point_on_segment(&Point3::new(-5.0, 1.0, 0.0), &a, &b), a);
        assert_eq!(closest_point_on_segment(&Point3::new(5.0, 1.0, 0.0), &a, &b), b);
        assert_eq!(closest_point_on_segment(&Point3::new(2.0, 0.0, 0.0), &a, &a), a);
    }

    #[test]
    fn test_surface_point_outside_cube() {
        let mesh = cube(2.0);
        let p = closest_surface_point(&mesh, &Point3::new(1.0, 1.0, 5.0)).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 1.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_surface_point_inside_cube_snaps_to_nearest_face() {
        let mesh = cube(2.0);
        let p = closest_surface_point(&mesh, &Point3::new(1.0, 1.0, 0.25)).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_surface_point_open_mesh() {
        let [a, b, c] = unit_triangle();
        let mesh = TriangleMesh::from_parts(&[a, b, c], &[[0, 1, 2]])
            .assume_world()
            .unwrap();
        let p = closest_surface_point(&mesh, &Point3::new(0.1, 0.2, -4.0)).unwrap();
        assert_relative_eq!(p, Point3::new(0.1, 0.2, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let mesh = cube(3.0);
        let queries = [
            Point3::new(1.5, 1.5, 9.0),
            Point3::new(-2.0, 0.7, 1.1),
            Point3::new(4.0, 4.0, 4.0),
            Point3::new(1.0, 2.9, 1.2),
        ];
        for q in queries {
            let once = closest_surface_point(&mesh, &q).unwrap();
            let twice = closest_surface_point(&mesh, &once).unwrap();
            assert!((once - twice).norm() < 1e-12, "{once} vs {twice}");
        }
    }

    #[test]
    fn test_no_faces() {
        let mesh = TriangleMesh {
            vertices: vec![0.0, 0.0, 0.0],
            indices: vec![],
        }
        .assume_world()
        .unwrap();
        assert_eq!(
            closest_surface_point(&mesh, &Point3::origin()),
            Err(MeshError::NoFaces)
        );
    }
}
