// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planning which asset goes on which anchor, and with what pose and scale.
//!
//! Nothing is instantiated here: the plan is handed to whatever layer owns scene objects.

use std::collections::HashMap;

use glam::DVec3;
use rand::Rng;
use tracing::trace;
use understory_anchor::{Anchor, AnchorGeometry, AnchorLabels, Pose};

use crate::room::{AnchorId, Room};

/// How an asset is fitted to its anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalingMode {
    /// Scale each axis independently to match the anchor.
    #[default]
    Stretch,
    /// Scale all axes by the smallest per-axis factor.
    UniformScaling,
    /// Scale X and Y by their smaller factor; Z matches the anchor.
    UniformXyScale,
    /// Keep the asset's native size.
    NoScaling,
}

/// An asset and its native bounding size (X width, Y depth, Z height).
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnAsset {
    /// Asset name, opaque to the room.
    pub name: String,
    /// Native size.
    pub size: DVec3,
}

/// Candidate assets for one label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnGroup {
    /// One is picked at random per anchor.
    pub assets: Vec<SpawnAsset>,
    /// Fitting rule.
    pub scaling: ScalingMode,
}

/// What fills an anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnSource {
    /// A named asset from a [`SpawnGroup`].
    Asset(String),
    /// Geometry generated from the anchor itself.
    Procedural,
}

/// One planned object.
#[derive(Clone, Debug, PartialEq)]
pub struct InteriorPlacement {
    /// The anchor filled.
    pub anchor: AnchorId,
    /// What fills it.
    pub source: SpawnSource,
    /// World pose: volume bottom center or plane center, with the anchor's rotation.
    pub pose: Pose,
    /// Per-axis scale applied to the asset.
    pub scale: DVec3,
}

fn ratio(target: f64, native: f64) -> f64 {
    if native > f64::EPSILON && target > f64::EPSILON {
        target / native
    } else {
        1.0
    }
}

fn fit(extent: DVec3, native: DVec3, scaling: ScalingMode) -> DVec3 {
    let raw = DVec3::new(
        ratio(extent.x, native.x),
        ratio(extent.y, native.y),
        ratio(extent.z, native.z),
    );
    match scaling {
        ScalingMode::Stretch => raw,
        ScalingMode::UniformScaling => {
            let s = if extent.z > f64::EPSILON {
                raw.min_element()
            } else {
                raw.x.min(raw.y)
            };
            DVec3::splat(s)
        }
        ScalingMode::UniformXyScale => {
            let s = raw.x.min(raw.y);
            DVec3::new(s, s, raw.z)
        }
        ScalingMode::NoScaling => DVec3::ONE,
    }
}

/// Placement frame and local extent of an anchor.
fn frame(anchor: &Anchor) -> (Pose, DVec3) {
    match &anchor.geometry {
        AnchorGeometry::Volume(volume) => (
            Pose::new(
                anchor.pose.transform_point(volume.bottom_center()),
                anchor.pose.rotation,
            ),
            volume.size(),
        ),
        AnchorGeometry::Plane(plane) => {
            let rect = plane.rect();
            (
                Pose::new(
                    anchor.surface_center().unwrap_or(anchor.pose.translation),
                    anchor.pose.rotation,
                ),
                DVec3::new(rect.width(), rect.height(), 0.0),
            )
        }
        AnchorGeometry::Mesh(_) => (anchor.pose, DVec3::ZERO),
    }
}

impl Room {
    /// [`Room::plan_interior_from_rng`] with the thread-local generator.
    pub fn plan_interior(
        &self,
        groups: &HashMap<AnchorLabels, SpawnGroup>,
        fallback_to_procedural: bool,
    ) -> Vec<InteriorPlacement> {
        self.plan_interior_from_rng(&mut rand::thread_rng(), groups, fallback_to_procedural)
    }

    /// Plan one object per anchor.
    ///
    /// The group is looked up by each of the anchor's labels in bit order; the first label with
    /// a non-empty group wins. Anchors without a group get a procedural placement when
    /// `fallback_to_procedural` is set and are skipped otherwise. The global mesh is only
    /// filled when its label is mapped.
    pub fn plan_interior_from_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        groups: &HashMap<AnchorLabels, SpawnGroup>,
        fallback_to_procedural: bool,
    ) -> Vec<InteriorPlacement> {
        let mut plan = Vec::new();
        for (id, anchor) in self.anchors() {
            let group = anchor
                .labels
                .iter()
                .filter_map(|label| groups.get(&label))
                .find(|group| !group.assets.is_empty());
            let (pose, extent) = frame(anchor);
            let placement = match group {
                Some(group) => {
                    let asset = &group.assets[rng.gen_range(0..group.assets.len())];
                    InteriorPlacement {
                        anchor: id,
                        source: SpawnSource::Asset(asset.name.clone()),
                        pose,
                        scale: fit(extent, asset.size, group.scaling),
                    }
                }
                None if fallback_to_procedural
                    && !anchor.has_any_label(AnchorLabels::GLOBAL_MESH) =>
                {
                    InteriorPlacement {
                        anchor: id,
                        source: SpawnSource::Procedural,
                        pose,
                        scale: DVec3::ONE,
                    }
                }
                None => continue,
            };
            trace!(anchor = ?id, source = ?placement.source, "planned interior object");
            plan.push(placement);
        }
        plan
    }
}
