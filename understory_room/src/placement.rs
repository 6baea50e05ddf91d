// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seat search and placement poses derived from raycasts.

use glam::DVec3;
use understory_anchor::{Anchor, AnchorGeometry, LabelFilter, Pose, Ray, Segment, UP};

use crate::query::RaycastHit;
use crate::room::{AnchorId, Room, Seat};

/// How [`Room::get_best_pose_from_raycast`] positions content on the struck surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositioningMethod {
    /// At the hit point.
    #[default]
    Default,
    /// At the center of the struck surface: polygon centroid or volume top center.
    Center,
    /// On the surface edge nearest the viewer, facing outward across it.
    Edge,
}

/// A pose on a specific anchor. X forward, Z up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementPose {
    /// The anchor the pose sits on.
    pub anchor: AnchorId,
    /// World pose.
    pub pose: Pose,
}

/// Normals within this cosine of up count as facing up.
const FACING_UP: f64 = 0.9;

fn horizontal(v: DVec3) -> Option<DVec3> {
    v.with_z(0.0).try_normalize()
}

/// Yaw-only pose at `position` looking along `forward`, or along `fallback` when `forward` is
/// vertical.
fn upright(position: DVec3, forward: DVec3, fallback: DVec3) -> Pose {
    let facing = horizontal(forward)
        .or_else(|| horizontal(fallback))
        .unwrap_or(DVec3::X);
    Pose::from_forward_up(position, facing, UP)
}

/// Outward direction across `edge`, within the surface whose normal is `normal`, pointing away
/// from `center`.
fn outward(edge: &Segment, normal: DVec3, center: DVec3) -> DVec3 {
    let across = edge.direction().cross(normal);
    if across.dot(edge.midpoint() - center) < 0.0 {
        -across
    } else {
        across
    }
}

impl Room {
    /// The seat whose position is closest to the line through the ray.
    ///
    /// The ray does not need to hit the seat anchor.
    pub fn try_get_closest_seat_pose(&self, origin: DVec3, direction: DVec3) -> Option<Seat> {
        let ray = Ray::new(origin, direction)?;
        let mut best: Option<(Seat, f64)> = None;
        for seat in &self.seats {
            let d = ray.line_distance(seat.pose.translation);
            if best.is_none_or(|(_, b)| d < b) {
                best = Some((*seat, d));
            }
        }
        best.map(|(seat, _)| seat)
    }

    /// Raycast, then derive a placement pose on the struck anchor.
    ///
    /// Rotation by role: walls face along the hit normal; the top of a volume faces outward
    /// from its long top edge nearest the viewer; other upward or downward surfaces face the
    /// ray origin, yaw only. See [`PositioningMethod`] for the position.
    pub fn get_best_pose_from_raycast(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        filter: LabelFilter,
        method: PositioningMethod,
    ) -> Option<PlacementPose> {
        let RaycastHit { anchor: id, hit } =
            self.raycast(origin, direction, max_distance, filter)?;
        let anchor = self.anchor(id)?;
        let pose = match method {
            PositioningMethod::Default => self.role_pose(id, anchor, hit.point, hit.normal, origin),
            PositioningMethod::Center => {
                let center = anchor.surface_center().unwrap_or(hit.point);
                self.role_pose(id, anchor, center, hit.normal, origin)
            }
            PositioningMethod::Edge => match anchor.nearest_edge(origin) {
                Some(edge) if !matches!(anchor.geometry, AnchorGeometry::Mesh(_)) => {
                    edge_pose(anchor, &edge, origin)
                }
                _ => self.role_pose(id, anchor, hit.point, hit.normal, origin),
            },
        };
        Some(PlacementPose { anchor: id, pose })
    }

    fn role_pose(
        &self,
        id: AnchorId,
        anchor: &Anchor,
        position: DVec3,
        hit_normal: DVec3,
        origin: DVec3,
    ) -> Pose {
        let toward_viewer = origin - position;
        if self.is_wall_anchor(id) {
            return upright(position, hit_normal, toward_viewer);
        }
        let facing_up = hit_normal.dot(UP);
        if let AnchorGeometry::Volume(volume) = &anchor.geometry {
            if facing_up > FACING_UP {
                let edges = anchor.surface_edges();
                let size = volume.size();
                let long = size.x.max(size.y);
                let center = anchor.surface_center().unwrap_or(position);
                let nearest_long = edges
                    .iter()
                    .filter(|e| e.length() >= long - 1e-9)
                    .min_by(|a, b| {
                        a.midpoint()
                            .distance(origin)
                            .total_cmp(&b.midpoint().distance(origin))
                    });
                if let Some(edge) = nearest_long {
                    return upright(position, outward(edge, anchor.normal(), center), toward_viewer);
                }
            }
        }
        if facing_up.abs() > FACING_UP {
            upright(position, toward_viewer, -hit_normal)
        } else {
            upright(position, hit_normal, toward_viewer)
        }
    }
}

fn edge_pose(anchor: &Anchor, edge: &Segment, origin: DVec3) -> Pose {
    let point = edge.closest_point(origin);
    let center = anchor.surface_center().unwrap_or(point);
    let mut normal = anchor.normal();
    if normal.dot(origin - point) < 0.0 {
        normal = -normal;
    }
    let forward = outward(edge, normal, center);
    if normal.dot(UP).abs() > FACING_UP {
        upright(point, forward, origin - point)
    } else {
        Pose::from_forward_up(point, forward, normal)
    }
}
