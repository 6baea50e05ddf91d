// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid world transforms.

use glam::{DMat3, DQuat, DVec3};

/// World up. Rooms are Z-up.
pub const UP: DVec3 = DVec3::Z;

/// Rigid transform: rotation followed by translation.
///
/// Two local-frame conventions are used with poses:
/// - Anchor frames: planar content lies in local XY and local +Z is the surface normal
///   (see [`Pose::from_surface_normal`]).
/// - Placement frames: local +X is forward and local +Z is up (see [`Pose::from_forward_up`]).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    /// World-space position of the local origin.
    pub translation: DVec3,
    /// Orientation of the local frame. Expected to be normalized.
    pub rotation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Create a pose from translation and rotation.
    pub const fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// A pure translation.
    pub const fn from_translation(translation: DVec3) -> Self {
        Self::new(translation, DQuat::IDENTITY)
    }

    /// Anchor frame whose local +Z is `normal`.
    ///
    /// Local +Y is as close to world up as possible; for horizontal surfaces (normal parallel to
    /// up) local +Y is world +Y. Falls back to identity rotation for a zero normal.
    pub fn from_surface_normal(translation: DVec3, normal: DVec3) -> Self {
        let Some(z) = normal.try_normalize() else {
            return Self::from_translation(translation);
        };
        let hint = if z.dot(UP).abs() > 0.999 { DVec3::Y } else { UP };
        let x = hint.cross(z).normalize();
        let y = z.cross(x);
        Self::new(translation, DQuat::from_mat3(&DMat3::from_cols(x, y, z)))
    }

    /// Placement frame looking along `forward` with `up` as close to local +Z as possible.
    ///
    /// Falls back to identity rotation when `forward` is zero or parallel to `up`.
    pub fn from_forward_up(translation: DVec3, forward: DVec3, up: DVec3) -> Self {
        let (Some(x), Some(up)) = (forward.try_normalize(), up.try_normalize()) else {
            return Self::from_translation(translation);
        };
        let Some(y) = up.cross(x).try_normalize() else {
            return Self::from_translation(translation);
        };
        let z = x.cross(y);
        Self::new(translation, DQuat::from_mat3(&DMat3::from_cols(x, y, z)))
    }

    /// Map a local point to world space.
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.rotation * p + self.translation
    }

    /// Map a local direction to world space.
    pub fn transform_vector(&self, v: DVec3) -> DVec3 {
        self.rotation * v
    }

    /// Map a world point to local space.
    pub fn inverse_transform_point(&self, p: DVec3) -> DVec3 {
        self.rotation.inverse() * (p - self.translation)
    }

    /// Map a world direction to local space.
    pub fn inverse_transform_vector(&self, v: DVec3) -> DVec3 {
        self.rotation.inverse() * v
    }

    /// Local +X in world space.
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Local +Y in world space.
    pub fn left(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// Local +Z in world space: the surface normal of an anchor frame, up of a placement frame.
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }
}
