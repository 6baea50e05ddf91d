// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchors: labeled geometry placed in the world.

use glam::DVec3;
use uuid::Uuid;

use crate::aabb::Aabb3;
use crate::geometry::{AnchorGeometry, SurfaceGeometry};
use crate::labels::AnchorLabels;
use crate::pose::Pose;
use crate::ray::{Hit, Ray, Segment, SurfacePoint};

/// A labeled spatial element of a room.
///
/// Queries on an anchor take and return world-space values; the geometry itself is stored in the
/// local frame given by [`Anchor::pose`].
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    /// Stable identity from the originating scan.
    pub uuid: Uuid,
    /// Semantic labels.
    pub labels: AnchorLabels,
    /// Local-to-world transform.
    pub pose: Pose,
    /// Primary geometry, in the local frame.
    pub geometry: AnchorGeometry,
}

impl Anchor {
    /// Create an anchor.
    pub fn new(
        uuid: Uuid,
        labels: AnchorLabels,
        pose: Pose,
        geometry: impl Into<AnchorGeometry>,
    ) -> Self {
        Self {
            uuid,
            labels,
            pose,
            geometry: geometry.into(),
        }
    }

    /// Whether the anchor carries any of `labels`.
    pub fn has_any_label(&self, labels: AnchorLabels) -> bool {
        self.labels.intersects(labels)
    }

    /// World-space containment. See [`SurfaceGeometry::contains`].
    pub fn contains_point(&self, p: DVec3, test_vertical: bool, tolerance: f64) -> bool {
        self.geometry
            .contains(self.pose.inverse_transform_point(p), test_vertical, tolerance)
    }

    /// World-space ray intersection.
    pub fn raycast(&self, ray: &Ray, max_distance: f64) -> Option<Hit> {
        self.geometry
            .raycast(&ray.to_local(&self.pose), max_distance)
            .map(|hit| hit.to_world(&self.pose))
    }

    /// World-space closest point on the surface.
    pub fn nearest_point(&self, p: DVec3) -> SurfacePoint {
        let local = self
            .geometry
            .nearest_point(self.pose.inverse_transform_point(p));
        SurfacePoint {
            point: self.pose.transform_point(local.point),
            distance: local.distance,
        }
    }

    /// World-space closest boundary edge.
    pub fn nearest_edge(&self, p: DVec3) -> Option<Segment> {
        self.geometry
            .nearest_edge(self.pose.inverse_transform_point(p))
            .map(|s| s.transformed(&self.pose))
    }

    /// World-space axis-aligned bounds of the geometry.
    pub fn world_bounds(&self) -> Aabb3 {
        self.geometry
            .local_bounds()
            .corners()
            .map(|corners| Aabb3::from_points(corners.map(|c| self.pose.transform_point(c))))
            .unwrap_or(Aabb3::EMPTY)
    }

    /// Area of the usable surface. See [`AnchorGeometry::surface_area`].
    pub fn surface_area(&self) -> Option<f64> {
        self.geometry.surface_area()
    }

    /// World-space center of the usable surface.
    pub fn surface_center(&self) -> Option<DVec3> {
        self.geometry
            .surface_center()
            .map(|c| self.pose.transform_point(c))
    }

    /// World-space outline of the usable surface.
    pub fn surface_edges(&self) -> Vec<Segment> {
        self.geometry
            .surface_edges()
            .iter()
            .map(|s| s.transformed(&self.pose))
            .collect()
    }

    /// Surface normal of a planar anchor, or the vertical axis of a volume, in world space.
    pub fn normal(&self) -> DVec3 {
        self.pose.up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneBoundary;
    use crate::volume::VolumeBounds;
    use kurbo::Rect;

    fn wall() -> Anchor {
        // 4m wide, 2m tall wall in the plane y = 0, facing +Y.
        Anchor::new(
            Uuid::nil(),
            AnchorLabels::WALL_FACE,
            Pose::from_surface_normal(DVec3::new(2.0, 0.0, 1.0), DVec3::Y),
            PlaneBoundary::from_rect(Rect::new(-2.0, -1.0, 2.0, 1.0)),
        )
    }

    #[test]
    fn wall_frame_is_upright() {
        let w = wall();
        assert!(w.normal().abs_diff_eq(DVec3::Y, 1e-12));
        let b = w.world_bounds();
        assert!(b.min.abs_diff_eq(DVec3::new(0.0, 0.0, 0.0), 1e-9));
        assert!(b.max.abs_diff_eq(DVec3::new(4.0, 0.0, 2.0), 1e-9));
    }

    #[test]
    fn world_queries_round_trip_through_pose() {
        let w = wall();
        assert!(w.contains_point(DVec3::new(3.0, 0.0, 0.5), true, 0.0));
        assert!(!w.contains_point(DVec3::new(3.0, 0.5, 0.5), true, 0.1));

        let ray = Ray::new(DVec3::new(1.0, 3.0, 1.0), DVec3::NEG_Y).unwrap();
        let hit = w.raycast(&ray, f64::INFINITY).unwrap();
        assert!(hit.point.abs_diff_eq(DVec3::new(1.0, 0.0, 1.0), 1e-9));
        assert!(hit.normal.abs_diff_eq(DVec3::Y, 1e-9));
        assert!((hit.distance - 3.0).abs() < 1e-9);

        let near = w.nearest_point(DVec3::new(5.0, 1.0, 1.0));
        assert!(near.point.abs_diff_eq(DVec3::new(4.0, 0.0, 1.0), 1e-9));
        assert!((near.distance - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn volume_surface_helpers() {
        let table = Anchor::new(
            Uuid::nil(),
            AnchorLabels::TABLE,
            Pose::from_translation(DVec3::new(1.0, 1.0, 0.0)),
            VolumeBounds::new(DVec3::new(-0.5, -0.25, 0.0), DVec3::new(0.5, 0.25, 0.8)).unwrap(),
        );
        assert_eq!(table.surface_area(), Some(0.5));
        assert!(
            table
                .surface_center()
                .unwrap()
                .abs_diff_eq(DVec3::new(1.0, 1.0, 0.8), 1e-12)
        );
        let edges = table.surface_edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| (e.start.z - 0.8).abs() < 1e-12));
    }
}
