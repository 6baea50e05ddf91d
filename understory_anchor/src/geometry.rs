// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared local-space query interface and the anchor geometry sum type.

use glam::DVec3;

use crate::aabb::Aabb3;
use crate::mesh::TriangleMesh;
use crate::plane::PlaneBoundary;
use crate::ray::{Hit, Ray, Segment, SurfacePoint};
use crate::volume::VolumeBounds;

/// Slack applied to boundary tests so points on an outline or face count as inside.
pub const EDGE_EPSILON: f64 = 1e-6;

/// Local-space queries every geometry kind answers.
///
/// All inputs and outputs are in the anchor's local frame. Implementations know nothing about
/// sibling anchors.
pub trait SurfaceGeometry {
    /// Whether `p` lies within the geometry, grown by `tolerance`.
    ///
    /// `test_vertical` additionally constrains the local Z axis: the distance to the plane for
    /// planar boundaries, the vertical extent for volumes.
    fn contains(&self, p: DVec3, test_vertical: bool, tolerance: f64) -> bool;

    /// Closest intersection no farther than `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<Hit>;

    /// Closest point on the surface.
    fn nearest_point(&self, p: DVec3) -> SurfacePoint;

    /// Closest boundary edge, if the geometry has one.
    fn nearest_edge(&self, p: DVec3) -> Option<Segment>;

    /// Local bounding box.
    fn local_bounds(&self) -> Aabb3;
}

/// Primary geometry of an anchor. Exactly one kind per anchor.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorGeometry {
    /// Planar polygon (walls, floor, ceiling, table tops, frames).
    Plane(PlaneBoundary),
    /// Box volume (furniture).
    Volume(VolumeBounds),
    /// Freeform triangle mesh (the global mesh).
    Mesh(TriangleMesh),
}

/// Discriminant of [`AnchorGeometry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// [`AnchorGeometry::Plane`].
    Plane,
    /// [`AnchorGeometry::Volume`].
    Volume,
    /// [`AnchorGeometry::Mesh`].
    Mesh,
}

impl AnchorGeometry {
    /// Which kind this is.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Plane(_) => GeometryKind::Plane,
            Self::Volume(_) => GeometryKind::Volume,
            Self::Mesh(_) => GeometryKind::Mesh,
        }
    }

    fn as_dyn(&self) -> &dyn SurfaceGeometry {
        match self {
            Self::Plane(p) => p,
            Self::Volume(v) => v,
            Self::Mesh(m) => m,
        }
    }

    /// Area of the usable surface: the polygon, or the top face of a volume.
    /// Meshes have none.
    pub fn surface_area(&self) -> Option<f64> {
        match self {
            Self::Plane(p) => Some(p.area()),
            Self::Volume(v) => Some(v.top_area()),
            Self::Mesh(_) => None,
        }
    }

    /// Local center of the usable surface: polygon centroid or top-face center.
    pub fn surface_center(&self) -> Option<DVec3> {
        match self {
            Self::Plane(p) => {
                let c = p.centroid();
                Some(DVec3::new(c.x, c.y, 0.0))
            }
            Self::Volume(v) => Some(v.top_center()),
            Self::Mesh(_) => None,
        }
    }

    /// Local outline of the usable surface: polygon edges or top-face edges.
    pub fn surface_edges(&self) -> Vec<Segment> {
        match self {
            Self::Plane(p) => p
                .edges()
                .map(|l| {
                    Segment::new(
                        DVec3::new(l.p0.x, l.p0.y, 0.0),
                        DVec3::new(l.p1.x, l.p1.y, 0.0),
                    )
                })
                .collect(),
            Self::Volume(v) => v.top_edges().to_vec(),
            Self::Mesh(_) => Vec::new(),
        }
    }
}

impl SurfaceGeometry for AnchorGeometry {
    fn contains(&self, p: DVec3, test_vertical: bool, tolerance: f64) -> bool {
        self.as_dyn().contains(p, test_vertical, tolerance)
    }

    fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<Hit> {
        self.as_dyn().raycast(ray, max_distance)
    }

    fn nearest_point(&self, p: DVec3) -> SurfacePoint {
        self.as_dyn().nearest_point(p)
    }

    fn nearest_edge(&self, p: DVec3) -> Option<Segment> {
        self.as_dyn().nearest_edge(p)
    }

    fn local_bounds(&self) -> Aabb3 {
        self.as_dyn().local_bounds()
    }
}

impl From<PlaneBoundary> for AnchorGeometry {
    fn from(p: PlaneBoundary) -> Self {
        Self::Plane(p)
    }
}

impl From<VolumeBounds> for AnchorGeometry {
    fn from(v: VolumeBounds) -> Self {
        Self::Volume(v)
    }
}

impl From<TriangleMesh> for AnchorGeometry {
    fn from(m: TriangleMesh) -> Self {
        Self::Mesh(m)
    }
}
