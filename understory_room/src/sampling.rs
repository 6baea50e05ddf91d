// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random positions inside a room.

use glam::DVec3;
use rand::Rng;
use tracing::debug;
use understory_anchor::{AnchorLabels, LabelFilter};

use crate::room::Room;

impl Room {
    /// [`Room::generate_random_position_in_room_from_rng`] with the thread-local generator.
    pub fn generate_random_position_in_room(
        &self,
        min_distance_to_surface: f64,
        avoid_volumes: bool,
    ) -> Option<DVec3> {
        self.generate_random_position_in_room_from_rng(
            &mut rand::thread_rng(),
            min_distance_to_surface,
            avoid_volumes,
        )
    }

    /// Rejection-sample a position inside the room.
    ///
    /// Candidates are drawn uniformly from the room bounds and accepted when they are inside
    /// the room (vertically too), at least `min_distance_to_surface` from every surface except
    /// the global mesh, and, with `avoid_volumes`, outside every scene volume grown by that
    /// distance. Gives up after [`RoomConfig::max_sample_attempts`](crate::RoomConfig) draws.
    pub fn generate_random_position_in_room_from_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min_distance_to_surface: f64,
        avoid_volumes: bool,
    ) -> Option<DVec3> {
        if self.bounds.is_empty() {
            return None;
        }
        let surfaces = LabelFilter::excluding(AnchorLabels::GLOBAL_MESH);
        let margin = min_distance_to_surface.max(0.0);
        let (min, extent) = (self.bounds.min, self.bounds.max - self.bounds.min);
        for _ in 0..self.config.max_sample_attempts {
            let t = DVec3::new(
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
            );
            let candidate = min + extent * t;
            if !self.is_position_in_room(candidate, true) {
                continue;
            }
            if margin > 0.0
                && self
                    .try_get_closest_surface_position(candidate, surfaces, 0.0)
                    .is_some_and(|closest| closest.distance < margin)
            {
                continue;
            }
            if avoid_volumes
                && self
                    .is_position_in_scene_volume(candidate, true, margin)
                    .is_some()
            {
                continue;
            }
            return Some(candidate);
        }
        debug!(
            attempts = self.config.max_sample_attempts,
            min_distance_to_surface, "no position satisfied the constraints"
        );
        None
    }
}
