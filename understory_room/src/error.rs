// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while loading external room data.

use thiserror::Error;
use understory_anchor::GeometryError;
use uuid::Uuid;

/// Failure to turn external data into room state. The room is left untouched.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document is not valid JSON or does not match the schema.
    #[error("malformed room document: {0}")]
    Json(#[from] serde_json::Error),

    /// The geometry in the document is invalid.
    #[error("invalid anchor geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// An anchor description carries no boundary, volume or mesh.
    #[error("anchor {uuid} has no geometry")]
    MissingGeometry {
        /// Identity of the offending anchor.
        uuid: Uuid,
    },
}
