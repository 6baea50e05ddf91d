// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture coordinates for wall meshes that stay continuous across wall seams.

use glam::DVec2;
use understory_anchor::{AnchorGeometry, EDGE_EPSILON, PlaneBoundary};

use crate::room::{AnchorId, Room};

/// How one UV channel is laid out on a wall.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TexCoordMode {
    /// Each wall spans `[0, 1]` on both axes.
    #[default]
    Stretch,
    /// One UV unit per meter, restarting at every wall.
    Metric,
    /// U runs continuously around the wall chain as a fraction of its perimeter; V spans the
    /// wall height.
    Seamless,
}

/// Affine UV mapping of wall-local meters, measured from the minimum corner of the wall's
/// bounding rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneUv {
    /// UV at the minimum corner.
    pub offset: DVec2,
    /// UV units per meter along local X and Y.
    pub scale: DVec2,
}

impl PlaneUv {
    /// UV of a wall-local offset from the rectangle's minimum corner.
    pub fn apply(&self, local: DVec2) -> DVec2 {
        self.offset + local * self.scale
    }
}

/// UV layout of one wall.
#[derive(Clone, Debug, PartialEq)]
pub struct WallUvLayout {
    /// The wall anchor.
    pub anchor: AnchorId,
    /// One mapping per requested channel.
    pub plane_uvs: Vec<PlaneUv>,
    /// Per channel, the UVs of the wall outline vertices in outline order.
    pub vertex_uvs: Vec<Vec<DVec2>>,
}

fn reciprocal(x: f64) -> f64 {
    if x > EDGE_EPSILON { 1.0 / x } else { 0.0 }
}

impl Room {
    /// Per-wall UV mappings for the given channels, in wall chain order.
    ///
    /// Seamless channels rely on the chain built by [`Room::recompute`]; reversed walls run U
    /// backwards so neighbors agree at every shared edge. A room without walls yields no layouts.
    pub fn compute_wall_mesh_uv_adjustments(&self, modes: &[TexCoordMode]) -> Vec<WallUvLayout> {
        let walls: Vec<(AnchorId, bool, &PlaneBoundary)> = self
            .walls
            .iter()
            .filter_map(|link| match &self.anchor(link.anchor)?.geometry {
                AnchorGeometry::Plane(plane) => Some((link.anchor, link.reversed, plane)),
                _ => None,
            })
            .collect();
        let perimeter: f64 = walls.iter().map(|(_, _, p)| p.rect().width()).sum();
        let per_meter = reciprocal(perimeter);

        let mut run = 0.0;
        let mut layouts = Vec::with_capacity(walls.len());
        for (anchor, reversed, plane) in walls {
            let rect = plane.rect();
            let (width, height) = (rect.width(), rect.height());
            let plane_uvs: Vec<PlaneUv> = modes
                .iter()
                .map(|mode| match mode {
                    TexCoordMode::Stretch => PlaneUv {
                        offset: DVec2::ZERO,
                        scale: DVec2::new(reciprocal(width), reciprocal(height)),
                    },
                    TexCoordMode::Metric => PlaneUv {
                        offset: DVec2::ZERO,
                        scale: DVec2::ONE,
                    },
                    TexCoordMode::Seamless if reversed => PlaneUv {
                        offset: DVec2::new((run + width) * per_meter, 0.0),
                        scale: DVec2::new(-per_meter, reciprocal(height)),
                    },
                    TexCoordMode::Seamless => PlaneUv {
                        offset: DVec2::new(run * per_meter, 0.0),
                        scale: DVec2::new(per_meter, reciprocal(height)),
                    },
                })
                .collect();
            let vertex_uvs = plane_uvs
                .iter()
                .map(|uv| {
                    plane
                        .outline()
                        .iter()
                        .map(|p| uv.apply(DVec2::new(p.x - rect.x0, p.y - rect.y0)))
                        .collect()
                })
                .collect();
            layouts.push(WallUvLayout {
                anchor,
                plane_uvs,
                vertex_uvs,
            });
            run += width;
        }
        layouts
    }
}
