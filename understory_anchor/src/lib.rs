// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_anchor --heading-base-level=0

//! Understory Anchor: labeled spatial anchors with local geometry queries.
//!
//! An [`Anchor`] is one element of a scanned room: a wall, the floor, a table, the global mesh.
//! It carries a set of [`AnchorLabels`], a world [`Pose`], and exactly one primary
//! [`AnchorGeometry`]:
//!
//! - [`PlaneBoundary`]: a closed polygon in the local XY plane, normal along local +Z.
//! - [`VolumeBounds`]: a local box whose top face sits at `max.z`.
//! - [`TriangleMesh`]: an indexed triangle mesh with optional UVs.
//!
//! Each kind implements [`SurfaceGeometry`], the four local-space primitives rooms are built on:
//! containment, ray intersection, closest point, and closest boundary edge.
//! [`Anchor`] lifts those into world space and knows nothing about its siblings.
//!
//! Worlds are Z-up ([`UP`]). Geometry is `f64` throughout; planar outlines use Kurbo types.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use kurbo::Rect;
//! use understory_anchor::{Anchor, AnchorLabels, PlaneBoundary, Pose, Ray};
//! use uuid::Uuid;
//!
//! // A 4m x 3m floor at z = 0.
//! let floor = Anchor::new(
//!     Uuid::nil(),
//!     AnchorLabels::FLOOR,
//!     Pose::from_surface_normal(DVec3::ZERO, DVec3::Z),
//!     PlaneBoundary::from_rect(Rect::new(0.0, 0.0, 4.0, 3.0)),
//! );
//!
//! let ray = Ray::new(DVec3::new(1.0, 1.0, 1.5), DVec3::NEG_Z).unwrap();
//! let hit = floor.raycast(&ray, f64::INFINITY).unwrap();
//! assert!((hit.distance - 1.5).abs() < 1e-9);
//! assert!(floor.contains_point(DVec3::new(2.0, 2.0, 0.0), true, 0.0));
//! ```

mod aabb;
mod anchor;
mod error;
mod geometry;
mod labels;
mod mesh;
mod plane;
mod pose;
mod ray;
mod volume;

pub use aabb::Aabb3;
pub use anchor::Anchor;
pub use error::GeometryError;
pub use geometry::{AnchorGeometry, EDGE_EPSILON, GeometryKind, SurfaceGeometry};
pub use labels::{AnchorLabels, LabelFilter};
pub use mesh::TriangleMesh;
pub use plane::PlaneBoundary;
pub use pose::{Pose, UP};
pub use ray::{Hit, Ray, Segment, SurfacePoint};
pub use volume::VolumeBounds;
