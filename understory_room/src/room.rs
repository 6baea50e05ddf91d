// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Room arena: anchor ownership, identity, events and the mutation paths.

use std::collections::HashSet;

use glam::DVec3;
use kurbo::BezPath;
use tracing::{debug, debug_span, trace, warn};
use understory_anchor::{Aabb3, Anchor, AnchorGeometry, AnchorLabels, Pose};
use uuid::Uuid;

use crate::config::RoomConfig;
use crate::data::RoomData;
use crate::events::{AnchorEvent, RoomObserver, emit};
use crate::hierarchy::seat_poses;

/// Identifier for an anchor in a [`Room`] (generational).
///
/// Ids stay valid until the anchor is removed or the room is cleared; after that they resolve
/// to `None` even if the slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AnchorId(u32, u32);

impl AnchorId {
    fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A wall in the connected wall sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WallLink {
    /// The wall anchor.
    pub anchor: AnchorId,
    /// The chain traverses this wall from its local +X end towards its local -X end.
    pub reversed: bool,
}

/// A seat pose derived from a seat anchor. X forward, Z up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Seat {
    /// The seat anchor the pose belongs to.
    pub anchor: AnchorId,
    /// World pose of the seat.
    pub pose: Pose,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    anchor: Anchor,
}

/// A scanned room: the owner of its anchors and of the structure derived from them.
///
/// Derived structure (bounds, hierarchy references, wall chain, edge polygon, seats) is rebuilt
/// by [`Room::recompute`], which [`Room::load_from_data`] runs once per load. The incremental
/// path [`Room::add_anchor`] keeps bounds, references and seats current but leaves the wall
/// chain and edge polygon alone; [`Room::needs_recompute`] reports when they may be stale.
pub struct Room {
    uuid: Uuid,
    pub(crate) config: RoomConfig,
    slots: Vec<Option<Slot>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) order: Vec<AnchorId>,
    pub(crate) bounds: Aabb3,
    pub(crate) edges: Vec<DVec3>,
    pub(crate) edge_path: BezPath,
    pub(crate) floor: Option<AnchorId>,
    pub(crate) ceiling: Option<AnchorId>,
    pub(crate) global_mesh: Option<AnchorId>,
    pub(crate) walls: Vec<WallLink>,
    pub(crate) walls_closed: bool,
    pub(crate) seat_anchors: Vec<AnchorId>,
    pub(crate) seats: Vec<Seat>,
    pub(crate) dirty: bool,
    observers: Vec<Box<dyn RoomObserver>>,
}

impl core::fmt::Debug for Room {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Room")
            .field("uuid", &self.uuid)
            .field("anchors", &self.order.len())
            .field("free_list", &self.free_list.len())
            .field("bounds", &self.bounds)
            .field("walls", &self.walls.len())
            .field("walls_closed", &self.walls_closed)
            .field("seats", &self.seats.len())
            .field("dirty", &self.dirty)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(Uuid::nil())
    }
}

impl Room {
    /// Create an empty room with the default configuration.
    pub fn new(uuid: Uuid) -> Self {
        Self::with_config(uuid, RoomConfig::default())
    }

    /// Create an empty room.
    pub fn with_config(uuid: Uuid, config: RoomConfig) -> Self {
        Self {
            uuid,
            config,
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
            bounds: Aabb3::EMPTY,
            edges: Vec::new(),
            edge_path: BezPath::new(),
            floor: None,
            ceiling: None,
            global_mesh: None,
            walls: Vec::new(),
            walls_closed: false,
            seat_anchors: Vec::new(),
            seats: Vec::new(),
            dirty: false,
            observers: Vec::new(),
        }
    }

    /// Identity of the scan this room came from.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Active configuration.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Register an observer of anchor events.
    pub fn subscribe(&mut self, observer: impl RoomObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Resolve an id. Stale ids yield `None`.
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        match self.slots.get(id.idx())? {
            Some(slot) if slot.generation == id.1 => Some(&slot.anchor),
            _ => None,
        }
    }

    /// Whether `id` refers to a live anchor.
    pub fn is_alive(&self, id: AnchorId) -> bool {
        self.anchor(id).is_some()
    }

    /// Find a live anchor by its scan identity.
    pub fn find_by_uuid(&self, uuid: Uuid) -> Option<AnchorId> {
        self.anchors()
            .find(|(_, anchor)| anchor.uuid == uuid)
            .map(|(id, _)| id)
    }

    /// All anchors in insertion order.
    pub fn anchors(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.anchor(id).map(|anchor| (id, anchor)))
    }

    /// Ids of all anchors in insertion order.
    pub fn anchor_ids(&self) -> &[AnchorId] {
        &self.order
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the room has no anchors.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// World bounds of every anchor; [`Aabb3::EMPTY`] for an empty room.
    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Ordered room outline at floor level, one vertex per wall corner.
    pub fn edges(&self) -> &[DVec3] {
        &self.edges
    }

    /// The floor anchor.
    pub fn floor(&self) -> Option<AnchorId> {
        self.floor
    }

    /// The ceiling anchor.
    pub fn ceiling(&self) -> Option<AnchorId> {
        self.ceiling
    }

    /// The global mesh anchor.
    pub fn global_mesh(&self) -> Option<AnchorId> {
        self.global_mesh
    }

    /// Wall anchors in chain order (insertion order for walls added since the last recompute).
    pub fn walls(&self) -> impl Iterator<Item = AnchorId> + '_ {
        self.walls.iter().map(|link| link.anchor)
    }

    /// The wall chain with traversal directions.
    pub fn wall_links(&self) -> &[WallLink] {
        &self.walls
    }

    /// Whether the last wall chaining produced a closed loop.
    pub fn walls_closed(&self) -> bool {
        self.walls_closed
    }

    /// Anchors that provide seats.
    pub fn seat_anchors(&self) -> &[AnchorId] {
        &self.seat_anchors
    }

    /// All seat poses.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Seat poses of one anchor.
    pub fn seats_of(&self, id: AnchorId) -> impl Iterator<Item = &Seat> + '_ {
        self.seats.iter().filter(move |seat| seat.anchor == id)
    }

    /// Whether mutations since the last [`Room::recompute`] may have left derived structure stale.
    pub fn needs_recompute(&self) -> bool {
        self.dirty
    }

    fn insert_slot(&mut self, anchor: Anchor) -> AnchorId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot { generation, anchor });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "AnchorId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Slot { generation, anchor }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "AnchorId uses 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        };
        let id = AnchorId::new(idx, generation);
        self.order.push(id);
        if let Some(Some(slot)) = self.slots.get(id.idx()) {
            emit(&mut self.observers, AnchorEvent::Created(id), &slot.anchor);
        }
        id
    }

    fn take_slot(&mut self, id: AnchorId) -> Option<Anchor> {
        if !self.is_alive(id) {
            return None;
        }
        let slot = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        self.order.retain(|&other| other != id);
        emit(&mut self.observers, AnchorEvent::Removed(id), &slot.anchor);
        Some(slot.anchor)
    }

    /// Add one anchor and update derived structure incrementally.
    ///
    /// Bounds grow to include the anchor, an unset floor, ceiling or global mesh reference is
    /// filled, walls are appended to the wall list unordered, and seats are computed for the
    /// anchor. The wall chain and the edge polygon are not rebuilt: call [`Room::recompute`]
    /// when they matter.
    pub fn add_anchor(&mut self, anchor: Anchor) -> AnchorId {
        let labels = anchor.labels;
        let is_plane = matches!(anchor.geometry, AnchorGeometry::Plane(_));
        let world_bounds = anchor.world_bounds();
        let id = self.insert_slot(anchor);

        self.bounds = self.bounds.union(&world_bounds);
        if labels.contains(AnchorLabels::FLOOR) && self.floor.is_none() {
            self.floor = Some(id);
        }
        if labels.contains(AnchorLabels::CEILING) && self.ceiling.is_none() {
            self.ceiling = Some(id);
        }
        if labels.contains(AnchorLabels::GLOBAL_MESH) && self.global_mesh.is_none() {
            self.global_mesh = Some(id);
        }
        if labels.intersects(AnchorLabels::WALLS) && is_plane {
            self.walls.push(WallLink {
                anchor: id,
                reversed: false,
            });
            self.walls_closed = false;
        }
        if labels.intersects(self.config.seat_labels) {
            self.seat_anchors.push(id);
            let center = self.bounds.center();
            if let Some(anchor) = self.anchor(id) {
                let poses = seat_poses(anchor, self.config.seat_width, center);
                self.seats
                    .extend(poses.into_iter().map(|pose| Seat { anchor: id, pose }));
            }
        }
        self.dirty = true;
        trace!(?id, ?labels, "added anchor incrementally");
        id
    }

    /// Remove one anchor, returning it. References to it are dropped from derived structure;
    /// bounds and the wall chain are left for [`Room::recompute`].
    pub fn remove_anchor(&mut self, id: AnchorId) -> Option<Anchor> {
        let anchor = self.take_slot(id)?;
        for reference in [&mut self.floor, &mut self.ceiling, &mut self.global_mesh] {
            if *reference == Some(id) {
                *reference = None;
            }
        }
        self.walls.retain(|link| link.anchor != id);
        self.seat_anchors.retain(|&other| other != id);
        self.seats.retain(|seat| seat.anchor != id);
        self.dirty = true;
        Some(anchor)
    }

    /// Replace a live anchor in place, keeping its id. Returns false for a stale id.
    pub fn replace_anchor(&mut self, id: AnchorId, anchor: Anchor) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let Some(Some(slot)) = self.slots.get_mut(id.idx()) else {
            return false;
        };
        slot.anchor = anchor;
        emit(&mut self.observers, AnchorEvent::Updated(id), &slot.anchor);
        self.dirty = true;
        true
    }

    /// Drop every anchor and reset all derived structure. Fires `Removed` for each anchor.
    ///
    /// Slot generations survive, so ids handed out before the clear stay stale.
    pub fn clear(&mut self) {
        let ids = core::mem::take(&mut self.order);
        for id in ids {
            if let Some(slot) = self.slots[id.idx()].take() {
                self.free_list.push(id.idx());
                emit(&mut self.observers, AnchorEvent::Removed(id), &slot.anchor);
            }
        }
        self.bounds = Aabb3::EMPTY;
        self.edges.clear();
        self.edge_path = BezPath::new();
        self.floor = None;
        self.ceiling = None;
        self.global_mesh = None;
        self.walls.clear();
        self.walls_closed = false;
        self.seat_anchors.clear();
        self.seats.clear();
        self.dirty = false;
    }

    /// Replace the anchor set with the one described by `data`, then recompute once.
    ///
    /// Anchors are matched by UUID: matches keep their id and fire `Updated` only when they
    /// changed, anchors missing from `data` are removed, new ones are created. Descriptions that
    /// fail to convert are skipped with a warning.
    pub fn load_from_data(&mut self, data: &RoomData) {
        let _span = debug_span!("load_from_data", room = %data.uuid).entered();
        self.uuid = data.uuid;

        let mut incoming = Vec::with_capacity(data.anchors.len());
        for anchor_data in &data.anchors {
            match anchor_data.to_anchor() {
                Ok(anchor) => incoming.push(anchor),
                Err(err) => warn!(anchor = %anchor_data.uuid, %err, "skipping anchor"),
            }
        }

        let keep: HashSet<Uuid> = incoming.iter().map(|anchor| anchor.uuid).collect();
        let stale: Vec<AnchorId> = self
            .anchors()
            .filter(|(_, anchor)| !keep.contains(&anchor.uuid))
            .map(|(id, _)| id)
            .collect();
        let removed = stale.len();
        for id in stale {
            self.take_slot(id);
        }

        let (mut created, mut updated) = (0_usize, 0_usize);
        for anchor in incoming {
            match self.find_by_uuid(anchor.uuid) {
                Some(id) => {
                    if self.anchor(id) != Some(&anchor) {
                        self.replace_anchor(id, anchor);
                        updated += 1;
                    }
                }
                None => {
                    self.insert_slot(anchor);
                    created += 1;
                }
            }
        }
        debug!(created, updated, removed, "anchor set loaded");
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{rectangle_room, rectangle_room_data};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(room: &mut Room) -> Rc<RefCell<Vec<AnchorEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        room.subscribe(move |event: AnchorEvent, _: &Anchor| sink.borrow_mut().push(event));
        events
    }

    #[test]
    fn load_classifies_and_fires_created() {
        let mut room = Room::default();
        let events = recorder(&mut room);
        let data = rectangle_room_data();
        room.load_from_data(&data);

        assert_eq!(room.uuid(), data.uuid);
        assert_eq!(room.len(), 6);
        assert!(room.floor().is_some());
        assert!(room.ceiling().is_some());
        assert_eq!(room.walls().count(), 4);
        assert!(!room.needs_recompute());
        assert_eq!(events.borrow().len(), 6);
        assert!(
            events
                .borrow()
                .iter()
                .all(|e| matches!(e, AnchorEvent::Created(_)))
        );
    }

    #[test]
    fn reload_diffs_by_uuid() {
        let mut room = Room::default();
        let mut data = rectangle_room_data();
        room.load_from_data(&data);
        let floor = room.floor().unwrap();
        let events = recorder(&mut room);

        // Same data: nothing fires and ids are kept.
        room.load_from_data(&data);
        assert!(events.borrow().is_empty());
        assert_eq!(room.floor(), Some(floor));

        // Move the ceiling, drop the last wall.
        let ceiling_uuid = room.anchor(room.ceiling().unwrap()).unwrap().uuid;
        let ceiling = data
            .anchors
            .iter_mut()
            .find(|a| a.uuid == ceiling_uuid)
            .unwrap();
        ceiling.transform.translation[2] = 2.75;
        let dropped = data.anchors.iter().rposition(|a| {
            a.semantic_classifications
                .iter()
                .any(|l| l.as_str() == "WALL_FACE")
        });
        data.anchors.remove(dropped.unwrap());
        room.load_from_data(&data);

        let seen = events.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().any(|e| matches!(e, AnchorEvent::Updated(_))));
        assert!(seen.iter().any(|e| matches!(e, AnchorEvent::Removed(_))));
        assert_eq!(room.walls().count(), 3);
        assert!((room.bounds().max.z - 2.75).abs() < 1e-9);
    }

    #[test]
    fn clear_empties_everything_and_stales_ids() {
        let mut room = rectangle_room();
        let floor = room.floor().unwrap();
        let events = recorder(&mut room);
        room.clear();

        assert_eq!(room.anchors().count(), 0);
        assert!(room.is_empty());
        assert_eq!(room.floor(), None);
        assert_eq!(room.ceiling(), None);
        assert_eq!(room.walls().count(), 0);
        assert!(room.edges().is_empty());
        assert!(room.bounds().is_empty());
        assert_eq!(events.borrow().len(), 6);
        assert!(room.anchor(floor).is_none());

        // A reused slot does not revive the old id.
        let again = room.add_anchor(crate::test_support::floor(4.0, 3.0));
        assert_ne!(again, floor);
        assert!(room.anchor(floor).is_none());
        assert!(room.anchor(again).is_some());
    }

    #[test]
    fn add_anchor_is_incremental() {
        let mut room = Room::default();
        let floor = room.add_anchor(crate::test_support::floor(4.0, 3.0));
        assert_eq!(room.floor(), Some(floor));
        assert!(room.needs_recompute());
        assert!(
            room.bounds()
                .max
                .abs_diff_eq(DVec3::new(4.0, 3.0, 0.0), 1e-9)
        );

        for wall in crate::test_support::rectangle_walls(4.0, 3.0, 2.5) {
            room.add_anchor(wall);
        }
        assert_eq!(room.walls().count(), 4);
        assert!(!room.walls_closed(), "chain is only built on recompute");
        room.recompute();
        assert!(room.walls_closed());
        assert!(!room.needs_recompute());
    }

    #[test]
    fn remove_and_replace() {
        let mut room = rectangle_room();
        let events = recorder(&mut room);
        let wall = room.walls().next().unwrap();

        let mut moved = room.anchor(wall).unwrap().clone();
        moved.pose.translation.z += 0.1;
        assert!(room.replace_anchor(wall, moved));
        let removed = room.remove_anchor(wall).unwrap();
        assert!((removed.pose.translation.z - 1.35).abs() < 1e-9);
        assert!(!room.is_wall_anchor(wall));
        assert!(!room.replace_anchor(wall, removed));
        assert!(room.remove_anchor(wall).is_none());
        assert_eq!(
            *events.borrow(),
            vec![AnchorEvent::Updated(wall), AnchorEvent::Removed(wall)]
        );
    }

    #[test]
    fn seats_follow_couches() {
        let mut room = rectangle_room();
        let couch = room.add_anchor(crate::test_support::couch(DVec3::new(2.0, 2.5, 0.0), 2.0));
        assert_eq!(room.seat_anchors(), &[couch]);
        assert_eq!(room.seats_of(couch).count(), 3);
        room.recompute();
        assert_eq!(room.seats().len(), 3);
    }
}
