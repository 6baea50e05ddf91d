// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planar boundaries: a closed polygon in the anchor's local XY plane.

use glam::DVec3;
use kurbo::{BezPath, Line, ParamCurve, ParamCurveNearest, Point, Rect, Shape};

use crate::aabb::Aabb3;
use crate::error::GeometryError;
use crate::geometry::{EDGE_EPSILON, SurfaceGeometry};
use crate::ray::{Hit, Ray, Segment, SurfacePoint};

const NEAREST_ACCURACY: f64 = 1e-9;

/// Closed polygon in local XY. The surface normal is local +Z.
///
/// Winding direction does not matter; self-intersecting outlines use the non-zero rule.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneBoundary {
    outline: Vec<Point>,
    path: BezPath,
    rect: Rect,
}

impl PlaneBoundary {
    /// Create a boundary from its outline. The closing edge is implicit.
    pub fn new(outline: impl IntoIterator<Item = Point>) -> Result<Self, GeometryError> {
        let outline: Vec<Point> = outline.into_iter().collect();
        if outline.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: outline.len(),
            });
        }
        let mut path = BezPath::new();
        path.move_to(outline[0]);
        for p in &outline[1..] {
            path.line_to(*p);
        }
        path.close_path();
        let rect = path.bounding_box();
        Ok(Self {
            outline,
            path,
            rect,
        })
    }

    /// Axis-aligned rectangle boundary.
    pub fn from_rect(rect: Rect) -> Self {
        let outline = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        let mut path = BezPath::new();
        path.move_to(outline[0]);
        for p in &outline[1..] {
            path.line_to(*p);
        }
        path.close_path();
        Self {
            outline: outline.to_vec(),
            path,
            rect: rect.abs(),
        }
    }

    /// Outline vertices in order.
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    /// Bounding rectangle of the outline.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Enclosed area (unsigned).
    pub fn area(&self) -> f64 {
        self.path.area().abs()
    }

    /// Area centroid. Falls back to the vertex average for zero-area outlines.
    pub fn centroid(&self) -> Point {
        let mut twice_area = 0.0;
        let (mut cx, mut cy) = (0.0, 0.0);
        for line in self.edges() {
            let (p, q) = (line.p0, line.p1);
            let cross = p.x * q.y - q.x * p.y;
            twice_area += cross;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        if twice_area.abs() <= f64::EPSILON {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Outlines have a handful of vertices."
            )]
            let n = self.outline.len() as f64;
            let sum = self
                .outline
                .iter()
                .fold(kurbo::Vec2::ZERO, |acc, p| acc + p.to_vec2());
            return (sum / n).to_point();
        }
        Point::new(cx / (3.0 * twice_area), cy / (3.0 * twice_area))
    }

    /// Outline edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let next = self.outline.iter().cycle().skip(1);
        self.outline
            .iter()
            .zip(next)
            .map(|(a, b)| Line::new(*a, *b))
    }

    /// Distance from `pt` to the outline.
    pub fn distance_to_outline(&self, pt: Point) -> f64 {
        self.edges()
            .map(|l| l.nearest(pt, NEAREST_ACCURACY).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// 2D containment. Points on the outline, or within `tolerance` of it, are inside.
    pub fn contains_2d(&self, pt: Point, tolerance: f64) -> bool {
        if self.path.winding(pt) != 0 {
            return true;
        }
        self.distance_to_outline(pt) <= tolerance.max(0.0) + EDGE_EPSILON
    }

    fn nearest_outline_point(&self, pt: Point) -> Point {
        let mut best = (f64::INFINITY, self.outline[0]);
        for line in self.edges() {
            let nearest = line.nearest(pt, NEAREST_ACCURACY);
            if nearest.distance_sq < best.0 {
                best = (nearest.distance_sq, line.eval(nearest.t));
            }
        }
        best.1
    }
}

fn lift(p: Point) -> DVec3 {
    DVec3::new(p.x, p.y, 0.0)
}

impl SurfaceGeometry for PlaneBoundary {
    fn contains(&self, p: DVec3, test_vertical: bool, tolerance: f64) -> bool {
        if test_vertical && p.z.abs() > tolerance.max(0.0) + EDGE_EPSILON {
            return false;
        }
        self.contains_2d(Point::new(p.x, p.y), tolerance)
    }

    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<Hit> {
        let dz = ray.direction.z;
        if dz.abs() <= f64::EPSILON {
            return None;
        }
        let t = -ray.origin.z / dz;
        if t < 0.0 || t > max_distance {
            return None;
        }
        let point = ray.at(t);
        if !self.contains_2d(Point::new(point.x, point.y), 0.0) {
            return None;
        }
        let normal = if dz < 0.0 { DVec3::Z } else { DVec3::NEG_Z };
        Some(Hit {
            point: DVec3::new(point.x, point.y, 0.0),
            normal,
            distance: t,
        })
    }

    fn nearest_point(&self, p: DVec3) -> SurfacePoint {
        let pt = Point::new(p.x, p.y);
        let on_plane = if self.path.winding(pt) != 0 {
            DVec3::new(p.x, p.y, 0.0)
        } else {
            lift(self.nearest_outline_point(pt))
        };
        SurfacePoint {
            point: on_plane,
            distance: on_plane.distance(p),
        }
    }

    fn nearest_edge(&self, p: DVec3) -> Option<Segment> {
        let pt = Point::new(p.x, p.y);
        self.edges()
            .map(|l| (l.nearest(pt, NEAREST_ACCURACY).distance_sq, l))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, l)| Segment::new(lift(l.p0), lift(l.p1)))
    }

    fn local_bounds(&self) -> Aabb3 {
        Aabb3::new(
            DVec3::new(self.rect.x0, self.rect.y0, 0.0),
            DVec3::new(self.rect.x1, self.rect.y1, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PlaneBoundary {
        PlaneBoundary::from_rect(Rect::new(-1.0, -1.0, 1.0, 1.0))
    }

    #[test]
    fn rejects_degenerate_outline() {
        let err = PlaneBoundary::new([Point::ZERO, Point::new(1.0, 0.0)]).unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices { count: 2 });
    }

    #[test]
    fn boundary_points_are_inside_and_on_surface() {
        let b = square();
        for pt in [
            Point::new(1.0, 0.0),
            Point::new(-1.0, -1.0),
            Point::new(0.25, 1.0),
        ] {
            let p = DVec3::new(pt.x, pt.y, 0.0);
            assert!(b.contains(p, true, 0.0), "{pt:?} should be inside");
            assert!(b.nearest_point(p).distance < 1e-9);
        }
    }

    #[test]
    fn vertical_test_uses_tolerance() {
        let b = square();
        let above = DVec3::new(0.0, 0.0, 0.05);
        assert!(b.contains(above, false, 0.0));
        assert!(!b.contains(above, true, 0.0));
        assert!(b.contains(above, true, 0.1));
    }

    #[test]
    fn area_and_centroid() {
        let l_shape = PlaneBoundary::new([
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ])
        .unwrap();
        assert!((l_shape.area() - 3.0).abs() < 1e-12);
        let c = l_shape.centroid();
        assert!((c.x - 5.0 / 6.0).abs() < 1e-12);
        assert!((c.y - 5.0 / 6.0).abs() < 1e-12);
        assert!(!l_shape.contains_2d(Point::new(1.5, 1.5), 0.0));
    }

    #[test]
    fn raycast_is_two_sided() {
        let b = square();
        let down = Ray::new(DVec3::new(0.5, 0.5, 2.0), DVec3::NEG_Z).unwrap();
        let hit = b.raycast(&down, f64::INFINITY).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-12);
        assert_eq!(hit.normal, DVec3::Z);

        let up = Ray::new(DVec3::new(0.5, 0.5, -1.0), DVec3::Z).unwrap();
        assert_eq!(b.raycast(&up, f64::INFINITY).unwrap().normal, DVec3::NEG_Z);

        assert!(b.raycast(&down, 1.0).is_none(), "max distance is respected");
        let miss = Ray::new(DVec3::new(3.0, 0.0, 1.0), DVec3::NEG_Z).unwrap();
        assert!(b.raycast(&miss, f64::INFINITY).is_none());
    }

    #[test]
    fn nearest_point_outside_outline() {
        let b = square();
        let sp = b.nearest_point(DVec3::new(3.0, 0.0, 4.0));
        assert!(sp.point.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), 1e-9));
        assert!((sp.distance - 20.0_f64.sqrt()).abs() < 1e-9);

        let edge = b.nearest_edge(DVec3::new(0.0, -3.0, 0.0)).unwrap();
        assert_eq!(edge.start.y, -1.0);
        assert_eq!(edge.end.y, -1.0);
    }
}
