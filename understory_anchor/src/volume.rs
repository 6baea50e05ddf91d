// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Volumes: oriented boxes given as a local axis-aligned box.

use glam::DVec3;
use kurbo::Rect;

use crate::aabb::Aabb3;
use crate::error::GeometryError;
use crate::geometry::{EDGE_EPSILON, SurfaceGeometry};
use crate::ray::{Hit, Ray, Segment, SurfacePoint};

/// Local box. Local +Z is the volume's vertical axis; the top face lies at `max.z`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VolumeBounds {
    min: DVec3,
    max: DVec3,
}

impl VolumeBounds {
    /// Create a volume from its local corners.
    pub fn new(min: DVec3, max: DVec3) -> Result<Self, GeometryError> {
        if !(min.is_finite() && max.is_finite()) || min.cmpgt(max).any() {
            return Err(GeometryError::InvertedVolume);
        }
        Ok(Self { min, max })
    }

    /// Minimum local corner.
    pub fn min(&self) -> DVec3 {
        self.min
    }

    /// Maximum local corner.
    pub fn max(&self) -> DVec3 {
        self.max
    }

    /// Extent along each local axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Footprint of the top face in local XY.
    pub fn top_rect(&self) -> Rect {
        Rect::new(self.min.x, self.min.y, self.max.x, self.max.y)
    }

    /// Center of the top face.
    pub fn top_center(&self) -> DVec3 {
        let c = 0.5 * (self.min + self.max);
        DVec3::new(c.x, c.y, self.max.z)
    }

    /// Center of the bottom face.
    pub fn bottom_center(&self) -> DVec3 {
        let c = 0.5 * (self.min + self.max);
        DVec3::new(c.x, c.y, self.min.z)
    }

    /// Area of the top face.
    pub fn top_area(&self) -> f64 {
        let s = self.size();
        s.x * s.y
    }

    /// The four edges of the top face, counter-clockwise seen from above.
    pub fn top_edges(&self) -> [Segment; 4] {
        let z = self.max.z;
        let (a, b) = (self.min, self.max);
        let c = [
            DVec3::new(a.x, a.y, z),
            DVec3::new(b.x, a.y, z),
            DVec3::new(b.x, b.y, z),
            DVec3::new(a.x, b.y, z),
        ];
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }
}

impl SurfaceGeometry for VolumeBounds {
    fn contains(&self, p: DVec3, test_vertical: bool, tolerance: f64) -> bool {
        let grow = tolerance.max(0.0) + EDGE_EPSILON;
        let (lo, hi) = (self.min - grow, self.max + grow);
        let horizontal = lo.x <= p.x && p.x <= hi.x && lo.y <= p.y && p.y <= hi.y;
        horizontal && (!test_vertical || (lo.z <= p.z && p.z <= hi.z))
    }

    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<Hit> {
        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;
        let mut enter_normal = DVec3::ZERO;
        let mut exit_normal = DVec3::ZERO;
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            if d.abs() <= f64::EPSILON {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t0 = (self.min[axis] - o) / d;
            let t1 = (self.max[axis] - o) / d;
            // Entering through the min face when travelling towards +axis.
            let (near, far, sign) = if t0 < t1 {
                (t0, t1, -1.0)
            } else {
                (t1, t0, 1.0)
            };
            if near > t_enter {
                t_enter = near;
                enter_normal = DVec3::AXES[axis] * sign;
            }
            if far < t_exit {
                t_exit = far;
                exit_normal = DVec3::AXES[axis] * -sign;
            }
        }
        if t_enter > t_exit || t_exit < 0.0 {
            return None;
        }
        let (t, normal) = if t_enter >= 0.0 {
            (t_enter, enter_normal)
        } else {
            (t_exit, exit_normal)
        };
        if t > max_distance {
            return None;
        }
        Some(Hit {
            point: ray.at(t),
            normal,
            distance: t,
        })
    }

    fn nearest_point(&self, p: DVec3) -> SurfacePoint {
        let clamped = p.clamp(self.min, self.max);
        if clamped != p {
            return SurfacePoint {
                point: clamped,
                distance: clamped.distance(p),
            };
        }
        // Inside: snap to the closest face.
        let below = p - self.min;
        let above = self.max - p;
        let mut best = (below.x, 0, self.min.x);
        for (d, axis, value) in [
            (below.y, 1, self.min.y),
            (below.z, 2, self.min.z),
            (above.x, 0, self.max.x),
            (above.y, 1, self.max.y),
            (above.z, 2, self.max.z),
        ] {
            if d < best.0 {
                best = (d, axis, value);
            }
        }
        let mut point = p;
        point[best.1] = best.2;
        SurfacePoint {
            point,
            distance: best.0,
        }
    }

    fn nearest_edge(&self, p: DVec3) -> Option<Segment> {
        self.top_edges()
            .into_iter()
            .min_by(|a, b| a.distance_to(p).total_cmp(&b.distance_to(p)))
    }

    fn local_bounds(&self) -> Aabb3 {
        Aabb3::new(self.min, self.max)
    }
}
