// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor fixtures shared by the unit tests.

use glam::DVec3;
use kurbo::{Point, Rect};
use understory_anchor::{Anchor, AnchorLabels, PlaneBoundary, Pose, VolumeBounds};
use uuid::Uuid;

use crate::data::{AnchorData, RoomData};
use crate::room::Room;

/// Wall of height `h` standing on the floor segment `start -> end`, facing left of travel.
pub(crate) fn wall(start: DVec3, end: DVec3, h: f64) -> Anchor {
    let run = (end - start).with_z(0.0);
    let w = run.length();
    let center = ((start + end) * 0.5).with_z(h * 0.5);
    Anchor::new(
        Uuid::new_v4(),
        AnchorLabels::WALL_FACE,
        Pose::from_surface_normal(center, run.cross(DVec3::Z)),
        PlaneBoundary::from_rect(Rect::new(-w * 0.5, -h * 0.5, w * 0.5, h * 0.5)),
    )
}

/// Floor covering `[0, w] x [0, d]`.
pub(crate) fn floor(w: f64, d: f64) -> Anchor {
    Anchor::new(
        Uuid::new_v4(),
        AnchorLabels::FLOOR,
        Pose::IDENTITY,
        PlaneBoundary::from_rect(Rect::new(0.0, 0.0, w, d)),
    )
}

/// Downward-facing ceiling over `[0, w] x [0, d]` at height `h`.
pub(crate) fn ceiling(w: f64, d: f64, h: f64) -> Anchor {
    // Facing down flips local X.
    Anchor::new(
        Uuid::new_v4(),
        AnchorLabels::CEILING,
        Pose::from_surface_normal(DVec3::new(0.0, 0.0, h), DVec3::NEG_Z),
        PlaneBoundary::from_rect(Rect::new(-w, 0.0, 0.0, d)),
    )
}

/// Four inward-facing walls around `[0, w] x [0, d]`, chained in order.
pub(crate) fn rectangle_walls(w: f64, d: f64, h: f64) -> Vec<Anchor> {
    let corners = [
        DVec3::new(w, 0.0, 0.0),
        DVec3::ZERO,
        DVec3::new(0.0, d, 0.0),
        DVec3::new(w, d, 0.0),
    ];
    (0..4)
        .map(|i| wall(corners[i], corners[(i + 1) % 4], h))
        .collect()
}

/// Couch of the given length along X, 0.8m deep and 0.5m high, standing at `bottom_center`.
pub(crate) fn couch(bottom_center: DVec3, length: f64) -> Anchor {
    Anchor::new(
        Uuid::new_v4(),
        AnchorLabels::COUCH,
        Pose::from_translation(bottom_center),
        VolumeBounds::new(
            DVec3::new(-length * 0.5, -0.4, 0.0),
            DVec3::new(length * 0.5, 0.4, 0.5),
        )
        .unwrap(),
    )
}

/// 1.0 x 0.8 table, 0.75m high, standing at `bottom_center`.
pub(crate) fn table(bottom_center: DVec3) -> Anchor {
    Anchor::new(
        Uuid::new_v4(),
        AnchorLabels::TABLE,
        Pose::from_translation(bottom_center),
        VolumeBounds::new(DVec3::new(-0.5, -0.4, 0.0), DVec3::new(0.5, 0.4, 0.75)).unwrap(),
    )
}

/// L-shaped floor: the 2 x 2 square minus its `[1, 2] x [1, 2]` quadrant.
pub(crate) fn l_floor() -> Anchor {
    let outline = [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)];
    Anchor::new(
        Uuid::new_v4(),
        AnchorLabels::FLOOR,
        Pose::IDENTITY,
        PlaneBoundary::new(outline.map(|(x, y)| Point::new(x, y))).unwrap(),
    )
}

/// A 4 x 3 x 2.5 room: floor, ceiling, then four walls.
pub(crate) fn rectangle_room_data() -> RoomData {
    let mut anchors = vec![floor(4.0, 3.0), ceiling(4.0, 3.0, 2.5)];
    anchors.extend(rectangle_walls(4.0, 3.0, 2.5));
    RoomData {
        uuid: Uuid::from_u128(0x5EED),
        bounds: None,
        anchors: anchors.iter().map(AnchorData::from_anchor).collect(),
    }
}

/// [`rectangle_room_data`] loaded into a fresh room.
pub(crate) fn rectangle_room() -> Room {
    let mut room = Room::default();
    room.load_from_data(&rectangle_room_data());
    room
}
