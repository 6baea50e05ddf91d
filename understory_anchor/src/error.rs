// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while validating anchor geometry.

use core::fmt;

/// Reasons a geometry description is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A planar boundary needs at least three vertices.
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },
    /// A volume's minimum corner exceeds its maximum on some axis, or a coordinate is not finite.
    InvertedVolume,
    /// A mesh without vertices or triangles.
    EmptyMesh,
    /// A triangle references a vertex that does not exist.
    IndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// UVs were supplied but not one per vertex.
    UvCountMismatch {
        /// Number of UVs supplied.
        uvs: usize,
        /// Number of vertices in the mesh.
        vertices: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewVertices { count } => {
                write!(f, "planar boundary needs at least 3 vertices, got {count}")
            }
            Self::InvertedVolume => write!(f, "volume bounds are inverted or not finite"),
            Self::EmptyMesh => write!(f, "mesh has no vertices or no triangles"),
            Self::IndexOutOfBounds {
                index,
                vertex_count,
            } => write!(
                f,
                "triangle index {index} out of bounds for {vertex_count} vertices"
            ),
            Self::UvCountMismatch { uvs, vertices } => {
                write!(f, "mesh has {uvs} UVs for {vertices} vertices")
            }
        }
    }
}

impl core::error::Error for GeometryError {}
