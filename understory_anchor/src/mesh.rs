// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Triangle meshes with optional per-vertex UVs.

use glam::{DVec2, DVec3};

use crate::aabb::Aabb3;
use crate::error::GeometryError;
use crate::geometry::SurfaceGeometry;
use crate::ray::{Hit, Ray, Segment, SurfacePoint};

/// Indexed triangle mesh in the anchor's local frame.
///
/// Meshes are surfaces, not solids: [`SurfaceGeometry::contains`] is always false.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    uvs: Vec<DVec2>,
}

impl TriangleMesh {
    /// Create a mesh, validating indices and UV count. `uvs` may be empty.
    pub fn new(
        positions: Vec<DVec3>,
        triangles: Vec<[u32; 3]>,
        uvs: Vec<DVec2>,
    ) -> Result<Self, GeometryError> {
        if positions.is_empty() || triangles.is_empty() {
            return Err(GeometryError::EmptyMesh);
        }
        if let Some(&index) = triangles
            .iter()
            .flatten()
            .find(|&&i| i as usize >= positions.len())
        {
            return Err(GeometryError::IndexOutOfBounds {
                index,
                vertex_count: positions.len(),
            });
        }
        if !uvs.is_empty() && uvs.len() != positions.len() {
            return Err(GeometryError::UvCountMismatch {
                uvs: uvs.len(),
                vertices: positions.len(),
            });
        }
        Ok(Self {
            positions,
            triangles,
            uvs,
        })
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Triangle vertex indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Per-vertex UVs; empty when the mesh has none.
    pub fn uvs(&self) -> &[DVec2] {
        &self.uvs
    }

    /// Corner positions of each triangle.
    pub fn triangle_corners(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.triangles.iter().map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }
}

/// Möller–Trumbore, two-sided. The normal faces the ray.
fn ray_triangle(ray: &Ray, [a, b, c]: [DVec3; 3]) -> Option<Hit> {
    let e1 = b - a;
    let e2 = c - a;
    let pvec = ray.direction.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() <= 1e-12 {
        return None;
    }
    let inv = 1.0 / det;
    let tvec = ray.origin - a;
    let u = tvec.dot(pvec) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(e1);
    let v = ray.direction.dot(qvec) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(qvec) * inv;
    if t < 0.0 {
        return None;
    }
    let mut normal = e1.cross(e2).normalize_or_zero();
    if normal.dot(ray.direction) > 0.0 {
        normal = -normal;
    }
    Some(Hit {
        point: ray.at(t),
        normal,
        distance: t,
    })
}

/// Closest point on triangle `abc` to `p` (Voronoi region walk).
fn closest_point_on_triangle(p: DVec3, [a, b, c]: [DVec3; 3]) -> DVec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }
    let sum = va + vb + vc;
    if sum.abs() <= f64::EPSILON {
        return a;
    }
    a + ab * (vb / sum) + ac * (vc / sum)
}

impl SurfaceGeometry for TriangleMesh {
    fn contains(&self, _p: DVec3, _test_vertical: bool, _tolerance: f64) -> bool {
        false
    }

    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<Hit> {
        self.triangle_corners()
            .filter_map(|tri| ray_triangle(ray, tri))
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn nearest_point(&self, p: DVec3) -> SurfacePoint {
        let mut best = SurfacePoint {
            point: self.positions[0],
            distance: self.positions[0].distance(p),
        };
        for tri in self.triangle_corners() {
            let q = closest_point_on_triangle(p, tri);
            let d = q.distance(p);
            if d < best.distance {
                best = SurfacePoint {
                    point: q,
                    distance: d,
                };
            }
        }
        best
    }

    fn nearest_edge(&self, p: DVec3) -> Option<Segment> {
        self.triangle_corners()
            .flat_map(|[a, b, c]| {
                [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)]
            })
            .min_by(|x, y| x.distance_to(p).total_cmp(&y.distance_to(p)))
    }

    fn local_bounds(&self) -> Aabb3 {
        Aabb3::from_points(self.positions.iter().copied())
    }
}
