// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived room structure: bounds, role references, the wall chain, the outline and seats.

use glam::DVec3;
use kurbo::{BezPath, Point};
use tracing::{debug, debug_span};
use understory_anchor::{Aabb3, Anchor, AnchorGeometry, AnchorLabels, Pose, UP};

use crate::room::{AnchorId, Room, Seat, WallLink};

/// World-space bottom endpoints of a planar wall: the local `min.x` and `max.x` corners at the
/// bottom of its bounding rectangle.
pub(crate) fn wall_endpoints(anchor: &Anchor) -> Option<(DVec3, DVec3)> {
    let AnchorGeometry::Plane(plane) = &anchor.geometry else {
        return None;
    };
    let r = plane.rect();
    Some((
        anchor.pose.transform_point(DVec3::new(r.x0, r.y0, 0.0)),
        anchor.pose.transform_point(DVec3::new(r.x1, r.y0, 0.0)),
    ))
}

/// Width of a planar wall along its local X axis.
pub(crate) fn wall_length(anchor: &Anchor) -> Option<f64> {
    match &anchor.geometry {
        AnchorGeometry::Plane(plane) => Some(plane.rect().width()),
        _ => None,
    }
}

fn xy_distance(a: DVec3, b: DVec3) -> f64 {
    a.truncate().distance(b.truncate())
}

/// Upper bound on the seats one anchor is split into.
const MAX_SEATS_PER_ANCHOR: usize = 64;

/// Seat poses along the long axis of an anchor's top surface, facing `room_center`.
pub(crate) fn seat_poses(anchor: &Anchor, seat_width: f64, room_center: DVec3) -> Vec<Pose> {
    let (rect, z) = match &anchor.geometry {
        AnchorGeometry::Volume(v) => (v.top_rect(), v.max().z),
        AnchorGeometry::Plane(p) => (p.rect(), 0.0),
        AnchorGeometry::Mesh(_) => return Vec::new(),
    };
    let along_x = rect.width() >= rect.height();
    let long = rect.width().max(rect.height());
    let count = if seat_width > 0.0 && long > seat_width {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "A seat count is a small positive integer."
        )]
        let n = (long / seat_width).floor() as usize;
        n.clamp(1, MAX_SEATS_PER_ANCHOR)
    } else {
        1
    };
    #[allow(
        clippy::cast_precision_loss,
        reason = "A seat count is a small positive integer."
    )]
    let step = long / count as f64;
    let center = rect.center();
    (0..count)
        .map(|i| {
            #[allow(
                clippy::cast_precision_loss,
                reason = "A seat count is a small positive integer."
            )]
            let t = step * (i as f64 + 0.5);
            let local = if along_x {
                DVec3::new(rect.x0 + t, center.y, z)
            } else {
                DVec3::new(center.x, rect.y0 + t, z)
            };
            let position = anchor.pose.transform_point(local);
            let mut facing = (room_center - position).with_z(0.0);
            if facing.length_squared() <= f64::EPSILON {
                facing = anchor.pose.forward().with_z(0.0);
            }
            Pose::from_forward_up(position, facing, UP)
        })
        .collect()
}

impl Room {
    /// Rebuild every derived structure from the anchor set.
    pub fn recompute(&mut self) {
        let _span = debug_span!("recompute", room = %self.uuid()).entered();
        self.compute_room_bounds();
        self.compute_anchor_hierarchy();
        self.compute_connected_walls();
        self.compute_room_edges();
        self.compute_seats();
        self.dirty = false;
        debug!(
            anchors = self.order.len(),
            walls = self.walls.len(),
            closed = self.walls_closed,
            seats = self.seats.len(),
            "room structure recomputed"
        );
    }

    /// Union of the world bounds of every anchor.
    pub fn compute_room_bounds(&mut self) {
        self.bounds = self
            .anchors()
            .fold(Aabb3::EMPTY, |acc, (_, a)| acc.union(&a.world_bounds()));
    }

    /// Assign floor, ceiling, global mesh, wall and seat-anchor references in one pass.
    ///
    /// The first anchor (insertion order) with a role label wins the role. Walls are every
    /// planar anchor carrying a wall label, unordered until [`Room::compute_connected_walls`].
    pub fn compute_anchor_hierarchy(&mut self) {
        let mut floor = None;
        let mut ceiling = None;
        let mut global_mesh = None;
        let mut walls = Vec::new();
        let mut seat_anchors = Vec::new();
        for (id, anchor) in self.anchors() {
            let labels = anchor.labels;
            if labels.contains(AnchorLabels::FLOOR) {
                floor.get_or_insert(id);
            }
            if labels.contains(AnchorLabels::CEILING) {
                ceiling.get_or_insert(id);
            }
            if labels.contains(AnchorLabels::GLOBAL_MESH) {
                global_mesh.get_or_insert(id);
            }
            if labels.intersects(AnchorLabels::WALLS)
                && matches!(anchor.geometry, AnchorGeometry::Plane(_))
            {
                walls.push(WallLink {
                    anchor: id,
                    reversed: false,
                });
            }
            if labels.intersects(self.config.seat_labels) {
                seat_anchors.push(id);
            }
        }
        self.floor = floor;
        self.ceiling = ceiling;
        self.global_mesh = global_mesh;
        self.walls = walls;
        self.walls_closed = false;
        self.seat_anchors = seat_anchors;
    }

    /// Order the walls into a chain by greedy endpoint matching.
    ///
    /// Starting from the first wall, each step takes the unvisited wall with a bottom endpoint
    /// closest (in XY) to the chain's open end; reaching a wall through its far endpoint marks
    /// it reversed. Gaps above the connection tolerance are logged and chaining continues. The
    /// chain is closed iff it has no gaps, at least three walls, and ends where it started.
    pub fn compute_connected_walls(&mut self) {
        let tolerance = self.config.wall_connection_tolerance;
        let walls: Vec<(AnchorId, DVec3, DVec3)> = self
            .walls
            .iter()
            .filter_map(|link| {
                let (start, end) = wall_endpoints(self.anchor(link.anchor)?)?;
                Some((link.anchor, start, end))
            })
            .collect();
        let Some(&(first, first_start, first_end)) = walls.first() else {
            self.walls.clear();
            self.walls_closed = false;
            return;
        };

        let mut visited = vec![false; walls.len()];
        visited[0] = true;
        let mut chain = vec![WallLink {
            anchor: first,
            reversed: false,
        }];
        let mut open_end = first_end;
        let mut gap = false;
        for _ in 1..walls.len() {
            let mut best: Option<(usize, bool, f64)> = None;
            for (i, &(_, start, end)) in walls.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let (to_start, to_end) = (xy_distance(open_end, start), xy_distance(open_end, end));
                let (reversed, d) = if to_end < to_start {
                    (true, to_end)
                } else {
                    (false, to_start)
                };
                if best.is_none_or(|(_, _, best_d)| d < best_d) {
                    best = Some((i, reversed, d));
                }
            }
            let Some((i, reversed, d)) = best else {
                break;
            };
            if d > tolerance {
                gap = true;
                debug!(wall = ?walls[i].0, gap = d, "wall chain gap");
            }
            visited[i] = true;
            chain.push(WallLink {
                anchor: walls[i].0,
                reversed,
            });
            open_end = if reversed { walls[i].1 } else { walls[i].2 };
        }

        let returns = xy_distance(open_end, first_start) <= tolerance;
        self.walls_closed = !gap && chain.len() >= 3 && returns;
        self.walls = chain;
    }

    /// Rebuild the outline polygon: the chain-start bottom corner of each wall in chain order,
    /// or the floor outline when the room has fewer than three walls.
    pub fn compute_room_edges(&mut self) {
        let mut edges: Vec<DVec3> = self
            .walls
            .iter()
            .filter_map(|link| {
                let (start, end) = wall_endpoints(self.anchor(link.anchor)?)?;
                Some(if link.reversed { end } else { start })
            })
            .collect();
        if edges.len() < 3 {
            edges = self
                .floor
                .and_then(|id| self.anchor(id))
                .and_then(|floor| match &floor.geometry {
                    AnchorGeometry::Plane(plane) => Some(
                        plane
                            .outline()
                            .iter()
                            .map(|p| floor.pose.transform_point(DVec3::new(p.x, p.y, 0.0)))
                            .collect(),
                    ),
                    _ => None,
                })
                .unwrap_or_default();
        }

        let mut path = BezPath::new();
        if edges.len() >= 3 {
            path.move_to(Point::new(edges[0].x, edges[0].y));
            for e in &edges[1..] {
                path.line_to(Point::new(e.x, e.y));
            }
            path.close_path();
        }
        self.edges = edges;
        self.edge_path = path;
    }

    /// Recompute the seat poses of every seat anchor.
    pub fn compute_seats(&mut self) {
        let center = self.bounds.center();
        let seat_width = self.config.seat_width;
        self.seats = self
            .seat_anchors
            .iter()
            .filter_map(|&id| Some((id, self.anchor(id)?)))
            .flat_map(|(id, anchor)| {
                seat_poses(anchor, seat_width, center)
                    .into_iter()
                    .map(move |pose| Seat { anchor: id, pose })
            })
            .collect();
    }
}
