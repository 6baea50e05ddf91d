// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes in 3D.

use glam::DVec3;

/// Axis-aligned bounding box in 3D.
///
/// The default value is [`Aabb3::EMPTY`], an inverted box that acts as the identity for
/// [`Aabb3::union`]. Planar content produces boxes with zero thickness along one axis;
/// those are not empty.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb3 {
    /// The empty (inverted) box.
    pub const EMPTY: Self = Self {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    /// Create a new AABB from min/max corners.
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point. Empty when `points` is empty.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |acc, p| acc.union_point(p))
    }

    /// Return true if the AABB is inverted on any axis. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Whether this AABB contains the point (boundary inclusive).
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.min.x <= p.x
            && self.min.y <= p.y
            && self.min.z <= p.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// Whether the XY footprint of this AABB contains the point; `z` is ignored.
    pub fn contains_point_xy(&self, p: DVec3) -> bool {
        self.min.x <= p.x && self.min.y <= p.y && p.x <= self.max.x && p.y <= self.max.y
    }

    /// The smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The smallest box containing this box and `p`.
    pub fn union_point(&self, p: DVec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Center of the box. Meaningless for empty boxes.
    pub fn center(&self) -> DVec3 {
        0.5 * (self.min + self.max)
    }

    /// Extent along each axis; zero for empty boxes.
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        self.max - self.min
    }

    /// The eight corners, or none for an empty box.
    pub fn corners(&self) -> Option<[DVec3; 8]> {
        if self.is_empty() {
            return None;
        }
        let (a, b) = (self.min, self.max);
        Some([
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ])
    }
}
