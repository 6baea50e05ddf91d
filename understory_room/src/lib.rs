// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_room --heading-base-level=0

//! Understory Room: a queryable model of a scanned mixed-reality room.
//!
//! A [`Room`] owns a set of [`Anchor`](understory_anchor::Anchor)s and derives the structure
//! scene code asks about: the floor and ceiling, walls chained into a loop, the floor-level edge
//! polygon, world bounds, and seat poses on couches. On top of that it answers spatial queries:
//!
//! - Containment: [`Room::is_position_in_room`], [`Room::is_position_in_scene_volume`].
//! - Rays: [`Room::raycast`], [`Room::raycast_all`], [`Room::get_best_pose_from_raycast`],
//!   [`Room::try_get_closest_seat_pose`].
//! - Proximity: [`Room::try_get_closest_surface_position`].
//! - Sampling: [`Room::generate_random_position_in_room`].
//! - Structure: [`Room::key_wall`], [`Room::largest_surface`], [`Room::anchors_by_label`].
//! - Planning: [`Room::compute_wall_mesh_uv_adjustments`], [`Room::plan_interior`].
//!
//! ## Updates
//!
//! There are two tiers. [`Room::load_from_data`] replaces the whole anchor set, diffing by UUID,
//! and recomputes everything once. [`Room::add_anchor`] and friends are incremental: they keep
//! bounds and the floor/ceiling/wall references current but leave the wall chain and edges stale
//! until [`Room::recompute`]. [`Room::needs_recompute`] tells you which state you are in.
//!
//! Every mutation reports an [`AnchorEvent`] to subscribed [`RoomObserver`]s before returning.
//!
//! Anchors are addressed by [`AnchorId`], a generational handle: ids of removed anchors never
//! resolve again, even when their slot is reused.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use understory_anchor::{AnchorLabels, LabelFilter};
//! use understory_room::{Room, RoomData};
//!
//! let json = r#"{
//!   "UUID": "6f0d8d50-63a0-4d6b-9d8b-0a3c7f8b2e11",
//!   "Anchors": [
//!     { "UUID": "9b1f8a9e-1c33-4f57-8a0e-7f6f2b9d6c01",
//!       "SemanticClassifications": ["FLOOR"],
//!       "PlaneBoundary2D": [[0, 0], [4, 0], [4, 3], [0, 3]] },
//!     { "UUID": "9b1f8a9e-1c33-4f57-8a0e-7f6f2b9d6c02",
//!       "SemanticClassifications": ["TABLE"],
//!       "Transform": { "Translation": [2, 1.5, 0], "Rotation": [0, 0, 0, 1] },
//!       "VolumeBounds": { "Min": [-0.5, -0.4, 0], "Max": [0.5, 0.4, 0.75] } }
//!   ]
//! }"#;
//!
//! let mut room = Room::default();
//! room.load_from_data(&RoomData::from_json_str(json).unwrap());
//! assert!(room.floor().is_some());
//! assert!(room.is_position_in_room(DVec3::new(1.0, 1.0, 0.5), false));
//!
//! let hit = room
//!     .raycast(DVec3::new(2.0, 1.5, 2.0), DVec3::NEG_Z, 0.0, LabelFilter::ALL)
//!     .unwrap();
//! assert_eq!(room.first_anchor_by_label(AnchorLabels::TABLE), Some(hit.anchor));
//! assert!((hit.hit.distance - 1.25).abs() < 1e-9);
//! ```

mod config;
mod data;
mod error;
mod events;
mod hierarchy;
mod interior;
mod placement;
mod query;
mod room;
mod sampling;
mod uv;

#[cfg(test)]
mod test_support;

pub use config::RoomConfig;
pub use data::{AnchorData, BoundsData, MeshData, RoomData, TransformData};
pub use error::LoadError;
pub use events::{AnchorEvent, RoomObserver};
pub use interior::{InteriorPlacement, ScalingMode, SpawnAsset, SpawnGroup, SpawnSource};
pub use placement::{PlacementPose, PositioningMethod};
pub use query::{ClosestSurface, RaycastHit};
pub use room::{AnchorId, Room, Seat, WallLink};
pub use uv::{PlaneUv, TexCoordMode, WallUvLayout};
