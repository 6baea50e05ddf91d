// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rays, hits, segments, and closest-point results.

use glam::DVec3;

use crate::pose::Pose;

/// A half-line with a unit direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`. Returns `None` for a zero or non-finite direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize()?,
        })
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Perpendicular distance from `p` to the infinite line through this ray.
    pub fn line_distance(&self, p: DVec3) -> f64 {
        let v = p - self.origin;
        (v - self.direction * v.dot(self.direction)).length()
    }

    /// This ray expressed in the local frame of `pose`. Distances are preserved.
    pub fn to_local(&self, pose: &Pose) -> Self {
        Self {
            origin: pose.inverse_transform_point(self.origin),
            direction: pose.inverse_transform_vector(self.direction),
        }
    }
}

/// Result of a ray intersection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Intersection point.
    pub point: DVec3,
    /// Unit surface normal at the intersection.
    pub normal: DVec3,
    /// Distance from the ray origin to `point`.
    pub distance: f64,
}

impl Hit {
    /// This hit mapped from the local frame of `pose` to world space.
    pub fn to_world(&self, pose: &Pose) -> Self {
        Self {
            point: pose.transform_point(self.point),
            normal: pose.transform_vector(self.normal),
            distance: self.distance,
        }
    }
}

/// A closest point on a surface and its distance from the query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfacePoint {
    /// Closest point.
    pub point: DVec3,
    /// Distance from the query point; zero iff the query point lies on the surface.
    pub distance: f64,
}

/// A straight boundary edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub start: DVec3,
    /// Second endpoint.
    pub end: DVec3,
}

impl Segment {
    /// Create a segment.
    pub const fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Midpoint.
    pub fn midpoint(&self) -> DVec3 {
        0.5 * (self.start + self.end)
    }

    /// Unit direction from `start` to `end`; zero for a degenerate segment.
    pub fn direction(&self) -> DVec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Closest point on the segment to `p`.
    pub fn closest_point(&self, p: DVec3) -> DVec3 {
        let d = self.end - self.start;
        let len_sq = d.length_squared();
        if len_sq <= f64::EPSILON {
            return self.start;
        }
        let t = ((p - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
        self.start + d * t
    }

    /// Distance from `p` to the segment.
    pub fn distance_to(&self, p: DVec3) -> f64 {
        self.closest_point(p).distance(p)
    }

    /// This segment mapped through `pose`.
    pub fn transformed(&self, pose: &Pose) -> Self {
        Self::new(pose.transform_point(self.start), pose.transform_point(self.end))
    }
}
