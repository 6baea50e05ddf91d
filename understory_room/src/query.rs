// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial queries over the anchors of a room.

use glam::DVec3;
use kurbo::{Point, Shape};
use understory_anchor::{AnchorLabels, EDGE_EPSILON, Hit, LabelFilter, Ray};

use crate::hierarchy::wall_length;
use crate::room::{AnchorId, Room};

/// A ray hit on a specific anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// The anchor that was hit.
    pub anchor: AnchorId,
    /// World-space hit.
    pub hit: Hit,
}

/// The closest surface point found by [`Room::try_get_closest_surface_position`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClosestSurface {
    /// The anchor owning the surface.
    pub anchor: AnchorId,
    /// Closest world-space point.
    pub point: DVec3,
    /// Distance from the query position.
    pub distance: f64,
}

/// Anchors that structure the room rather than occupy it.
const STRUCTURE: AnchorLabels = AnchorLabels::FLOOR
    .union(AnchorLabels::CEILING)
    .union(AnchorLabels::WALLS)
    .union(AnchorLabels::GLOBAL_MESH);

fn limit(max_distance: f64) -> f64 {
    if max_distance > 0.0 {
        max_distance
    } else {
        f64::INFINITY
    }
}

impl Room {
    /// Whether `pos` is inside the room outline and, with `test_vertical`, between the floor
    /// and the ceiling (inclusive).
    ///
    /// Without an outline only the room bounds are tested. Missing floor or ceiling anchors
    /// fall back to the room bounds.
    pub fn is_position_in_room(&self, pos: DVec3, test_vertical: bool) -> bool {
        if self.bounds.is_empty() || !self.bounds.contains_point_xy(pos) {
            return false;
        }
        if self.edges.len() >= 3 && self.edge_path.winding(Point::new(pos.x, pos.y)) == 0 {
            return false;
        }
        if test_vertical {
            let floor_z = self
                .floor
                .and_then(|id| self.anchor(id))
                .map_or(self.bounds.min.z, |a| a.pose.translation.z);
            let ceiling_z = self
                .ceiling
                .and_then(|id| self.anchor(id))
                .map_or(self.bounds.max.z, |a| a.pose.translation.z);
            if pos.z < floor_z - EDGE_EPSILON || pos.z > ceiling_z + EDGE_EPSILON {
                return false;
            }
        }
        true
    }

    /// Closest hit among the anchors passing `filter`.
    ///
    /// `max_distance <= 0` is unbounded. Equal distances go to the anchor inserted first.
    pub fn raycast(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        filter: LabelFilter,
    ) -> Option<RaycastHit> {
        let mut best: Option<RaycastHit> = None;
        for hit in self.raycast_all(origin, direction, max_distance, filter) {
            if best.is_none_or(|b| hit.hit.distance < b.hit.distance) {
                best = Some(hit);
            }
        }
        best
    }

    /// Every hit among the anchors passing `filter`, one per anchor, in insertion order.
    pub fn raycast_all(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        filter: LabelFilter,
    ) -> Vec<RaycastHit> {
        let Some(ray) = Ray::new(origin, direction) else {
            return Vec::new();
        };
        let max_distance = limit(max_distance);
        self.anchors()
            .filter(|(_, anchor)| filter.passes(anchor.labels))
            .filter_map(|(id, anchor)| {
                anchor
                    .raycast(&ray, max_distance)
                    .map(|hit| RaycastHit { anchor: id, hit })
            })
            .collect()
    }

    /// Closest surface point among the anchors passing `filter`.
    ///
    /// `max_distance <= 0` is unbounded. Fails when no anchor qualifies.
    pub fn try_get_closest_surface_position(
        &self,
        pos: DVec3,
        filter: LabelFilter,
        max_distance: f64,
    ) -> Option<ClosestSurface> {
        let max_distance = limit(max_distance);
        let mut best: Option<ClosestSurface> = None;
        for (id, anchor) in self.anchors() {
            if !filter.passes(anchor.labels) {
                continue;
            }
            let near = anchor.nearest_point(pos);
            if near.distance > max_distance {
                continue;
            }
            if best.is_none_or(|b| near.distance < b.distance) {
                best = Some(ClosestSurface {
                    anchor: id,
                    point: near.point,
                    distance: near.distance,
                });
            }
        }
        best
    }

    /// First non-structural anchor (not floor, ceiling, wall or global mesh) containing `pos`,
    /// grown by `tolerance`.
    pub fn is_position_in_scene_volume(
        &self,
        pos: DVec3,
        test_vertical: bool,
        tolerance: f64,
    ) -> Option<AnchorId> {
        self.anchors()
            .filter(|(_, anchor)| !anchor.has_any_label(STRUCTURE))
            .find(|(_, anchor)| anchor.contains_point(pos, test_vertical, tolerance))
            .map(|(id, _)| id)
    }

    /// The longest wall with no other wall corner more than `tolerance` behind its plane.
    ///
    /// Walls are considered longest first; equal lengths keep insertion order. Zero-length
    /// walls are never chosen.
    pub fn key_wall(&self, tolerance: f64) -> Option<AnchorId> {
        let mut walls: Vec<(AnchorId, f64)> = self
            .anchors()
            .filter(|(id, _)| self.is_wall_anchor(*id))
            .filter_map(|(id, anchor)| Some((id, wall_length(anchor)?)))
            .filter(|&(_, length)| length > EDGE_EPSILON)
            .collect();
        walls.sort_by(|a, b| b.1.total_cmp(&a.1));

        walls.iter().find_map(|&(id, _)| {
            let wall = self.anchor(id)?;
            let origin = wall.pose.translation;
            let normal = wall.normal();
            let occluded = self.walls().filter(|&other| other != id).any(|other| {
                self.anchor(other).is_some_and(|o| {
                    o.surface_edges()
                        .iter()
                        .any(|e| (e.start - origin).dot(normal) < -tolerance)
                })
            });
            (!occluded).then_some(id)
        })
    }

    /// Anchor carrying any of `labels` with the largest usable surface area. Zero-area
    /// surfaces never qualify; equal areas keep insertion order.
    pub fn largest_surface(&self, labels: AnchorLabels) -> Option<AnchorId> {
        let mut best: Option<(AnchorId, f64)> = None;
        for (id, anchor) in self.anchors() {
            if !anchor.has_any_label(labels) {
                continue;
            }
            let Some(area) = anchor.surface_area().filter(|&a| a > 0.0) else {
                continue;
            };
            if best.is_none_or(|(_, b)| area > b) {
                best = Some((id, area));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Whether any anchor carries any of `labels`.
    pub fn does_room_have(&self, labels: AnchorLabels) -> bool {
        self.anchors().any(|(_, anchor)| anchor.has_any_label(labels))
    }

    /// Anchors carrying any of `labels`, in insertion order.
    pub fn anchors_by_label(&self, labels: AnchorLabels) -> Vec<AnchorId> {
        self.anchors()
            .filter(|(_, anchor)| anchor.has_any_label(labels))
            .map(|(id, _)| id)
            .collect()
    }

    /// First anchor (insertion order) carrying any of `labels`.
    pub fn first_anchor_by_label(&self, labels: AnchorLabels) -> Option<AnchorId> {
        self.anchors()
            .find(|(_, anchor)| anchor.has_any_label(labels))
            .map(|(id, _)| id)
    }

    /// Whether `id` is one of the room's walls.
    pub fn is_wall_anchor(&self, id: AnchorId) -> bool {
        self.walls.iter().any(|link| link.anchor == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::wall_endpoints;
    use crate::test_support::{rectangle_room, table};
    use understory_anchor::{Anchor, PlaneBoundary, Pose};

    #[test]
    fn position_in_rectangle_room() {
        let room = rectangle_room();
        assert!(room.is_position_in_room(DVec3::new(2.0, 1.5, 1.0), true));
        assert!(!room.is_position_in_room(DVec3::new(5.0, 0.0, 1.0), true));
        assert!(!room.is_position_in_room(DVec3::new(2.0, 1.5, 3.0), true));
        assert!(room.is_position_in_room(DVec3::new(2.0, 1.5, 3.0), false));
        assert!(!Room::default().is_position_in_room(DVec3::ZERO, false));
    }

    #[test]
    fn position_outside_outline_but_inside_bounds() {
        // An L-shaped floor: the notch is inside the bounds but outside the outline.
        let mut room = Room::default();
        room.add_anchor(crate::test_support::l_floor());
        room.recompute();
        assert!(room.is_position_in_room(DVec3::new(0.5, 0.5, 0.0), false));
        assert!(!room.is_position_in_room(DVec3::new(1.5, 1.5, 0.0), false));
    }

    #[test]
    fn raycast_is_minimum_of_raycast_all() {
        let mut room = rectangle_room();
        room.add_anchor(table(DVec3::new(2.0, 1.5, 0.0)));
        let origin = DVec3::new(0.5, 0.5, 2.0);
        let direction = DVec3::new(1.0, 0.7, -1.2);
        let all = room.raycast_all(origin, direction, 0.0, LabelFilter::ALL);
        assert!(all.len() >= 2);
        let best = room
            .raycast(origin, direction, 0.0, LabelFilter::ALL)
            .unwrap();
        let min = all
            .iter()
            .map(|h| h.hit.distance)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(best.hit.distance, min);
    }

    #[test]
    fn raycast_filter_and_max_distance() {
        let room = rectangle_room();
        let down = DVec3::NEG_Z;
        let origin = DVec3::new(2.0, 1.5, 1.0);
        let floor = room.floor().unwrap();
        let hit = room.raycast(origin, down, 0.0, LabelFilter::ALL).unwrap();
        assert_eq!(hit.anchor, floor);
        assert!((hit.hit.distance - 1.0).abs() < 1e-9);
        assert!(room.raycast(origin, down, 0.5, LabelFilter::ALL).is_none());
        let no_floor = LabelFilter::excluding(AnchorLabels::FLOOR);
        assert!(room.raycast(origin, down, 0.0, no_floor).is_none());
        assert!(room.raycast(origin, DVec3::ZERO, 0.0, LabelFilter::ALL).is_none());
    }

    #[test]
    fn closest_surface() {
        let room = rectangle_room();
        let near_wall = DVec3::new(0.2, 1.5, 1.0);
        let closest = room
            .try_get_closest_surface_position(near_wall, LabelFilter::ALL, 0.0)
            .unwrap();
        assert!((closest.distance - 0.2).abs() < 1e-9);
        assert!(closest.point.abs_diff_eq(DVec3::new(0.0, 1.5, 1.0), 1e-9));
        assert!(room.is_wall_anchor(closest.anchor));

        assert!(
            room.try_get_closest_surface_position(near_wall, LabelFilter::ALL, 0.1)
                .is_none()
        );
        let nothing = LabelFilter::including(AnchorLabels::BED);
        assert!(
            room.try_get_closest_surface_position(near_wall, nothing, 0.0)
                .is_none()
        );
    }

    #[test]
    fn scene_volume_skips_structure() {
        let mut room = rectangle_room();
        assert_eq!(
            room.is_position_in_scene_volume(DVec3::new(2.0, 1.5, 0.0), true, 0.0),
            None
        );
        let t = room.add_anchor(table(DVec3::new(2.0, 1.5, 0.0)));
        assert_eq!(
            room.is_position_in_scene_volume(DVec3::new(2.0, 1.5, 0.3), true, 0.0),
            Some(t)
        );
        let above = DVec3::new(2.0, 1.5, 0.8);
        assert_eq!(room.is_position_in_scene_volume(above, true, 0.0), None);
        assert_eq!(room.is_position_in_scene_volume(above, true, 0.1), Some(t));
        assert_eq!(room.is_position_in_scene_volume(above, false, 0.0), Some(t));
    }

    #[test]
    fn raycast_ties_go_to_the_first_inserted() {
        let mut room = Room::default();
        let first = room.add_anchor(crate::test_support::floor(4.0, 3.0));
        let second = room.add_anchor(crate::test_support::floor(4.0, 3.0));
        room.recompute();
        let origin = DVec3::new(1.0, 1.0, 1.0);
        let all = room.raycast_all(origin, DVec3::NEG_Z, 0.0, LabelFilter::ALL);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].hit.distance, all[1].hit.distance);
        let hit = room
            .raycast(origin, DVec3::NEG_Z, 0.0, LabelFilter::ALL)
            .unwrap();
        assert_eq!(hit.anchor, first);
        assert_ne!(hit.anchor, second);
    }

    #[test]
    fn scene_plane_uses_tolerance_along_its_normal() {
        let mut room = rectangle_room();
        let top = room.add_anchor(Anchor::new(
            uuid::Uuid::new_v4(),
            AnchorLabels::TABLE,
            Pose::from_translation(DVec3::new(1.0, 1.0, 0.75)),
            PlaneBoundary::from_rect(kurbo::Rect::new(0.0, 0.0, 1.0, 0.8)),
        ));
        let on = DVec3::new(1.5, 1.4, 0.75);
        let above = DVec3::new(1.5, 1.4, 0.8);
        assert_eq!(room.is_position_in_scene_volume(on, true, 0.0), Some(top));
        assert_eq!(room.is_position_in_scene_volume(above, true, 0.0), None);
        assert_eq!(room.is_position_in_scene_volume(above, true, 0.1), Some(top));
        assert_eq!(room.is_position_in_scene_volume(above, false, 0.0), Some(top));
        let beside = DVec3::new(2.05, 1.4, 0.75);
        assert_eq!(room.is_position_in_scene_volume(beside, true, 0.0), None);
        assert_eq!(room.is_position_in_scene_volume(beside, true, 0.1), Some(top));
    }

    #[test]
    fn key_wall_is_first_long_wall() {
        let room = rectangle_room();
        let key = room.key_wall(0.1).unwrap();
        let first_wall = room.anchors_by_label(AnchorLabels::WALL_FACE)[0];
        assert_eq!(key, first_wall);
        let (s, e) = wall_endpoints(room.anchor(key).unwrap()).unwrap();
        assert!((s.distance(e) - 4.0).abs() < 1e-9);
        assert_eq!(Room::default().key_wall(0.1), None);
    }

    #[test]
    fn key_wall_skips_occluded_walls() {
        // A 4m wall standing in the middle of the room has walls behind it.
        let mut room = rectangle_room();
        let partition = room.add_anchor(crate::test_support::wall(
            DVec3::new(4.5, 1.0, 0.0),
            DVec3::new(-0.5, 1.0, 0.0),
            2.5,
        ));
        room.recompute();
        let key = room.key_wall(0.1).unwrap();
        assert_ne!(key, partition);
    }

    #[test]
    fn label_lookups() {
        let mut room = rectangle_room();
        assert!(room.does_room_have(AnchorLabels::FLOOR | AnchorLabels::BED));
        assert!(!room.does_room_have(AnchorLabels::BED));
        assert_eq!(room.anchors_by_label(AnchorLabels::WALLS).len(), 4);
        assert_eq!(
            room.first_anchor_by_label(AnchorLabels::CEILING),
            room.ceiling()
        );
        let t = room.add_anchor(table(DVec3::new(1.0, 1.0, 0.0)));
        assert_eq!(
            room.largest_surface(AnchorLabels::TABLE | AnchorLabels::FLOOR),
            room.floor()
        );
        assert_eq!(room.largest_surface(AnchorLabels::TABLE), Some(t));
        assert_eq!(room.largest_surface(AnchorLabels::BED), None);
    }
}
