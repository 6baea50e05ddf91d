// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The room interchange document and its conversion to and from room state.

use glam::{DQuat, DVec2, DVec3};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use tracing::warn;
use understory_anchor::{
    Anchor, AnchorGeometry, AnchorLabels, GeometryError, PlaneBoundary, Pose, TriangleMesh,
    VolumeBounds,
};
use uuid::Uuid;

use crate::error::LoadError;
use crate::room::{AnchorId, Room};

/// (De)serialize [`AnchorLabels`] as a list of interchange names. Unknown names and composite
/// masks such as `"WALLS"` read as `OTHER`.
pub(crate) mod label_names {
    use serde::{Deserialize, Deserializer, Serializer};
    use understory_anchor::AnchorLabels;

    pub(crate) fn serialize<S: Serializer>(
        labels: &AnchorLabels,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(labels.names())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<AnchorLabels, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(super::labels_from_names(&names))
    }
}

fn labels_from_names(names: &[String]) -> AnchorLabels {
    names
        .iter()
        .map(|name| {
            AnchorLabels::from_name(name)
                .filter(|label| label.bits().is_power_of_two())
                .unwrap_or(AnchorLabels::OTHER)
        })
        .fold(AnchorLabels::empty(), |acc, label| acc | label)
}

/// A room document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoomData {
    /// Identity of the scanned room.
    #[serde(rename = "UUID")]
    pub uuid: Uuid,
    /// World bounds. Written on serialize, ignored on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsData>,
    /// Anchor descriptions.
    #[serde(default)]
    pub anchors: Vec<AnchorData>,
}

impl RoomData {
    /// Parse a room document.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One anchor description. Geometry precedence on load: volume, then plane, then mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnchorData {
    /// Identity of the anchor.
    #[serde(rename = "UUID")]
    pub uuid: Uuid,
    /// Label interchange names such as `"WALL_FACE"`.
    #[serde(default)]
    pub semantic_classifications: Vec<String>,
    /// World transform.
    #[serde(default)]
    pub transform: TransformData,
    /// Planar outline in the anchor's local XY plane.
    #[serde(
        rename = "PlaneBoundary2D",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub plane_boundary_2d: Option<Vec<[f64; 2]>>,
    /// Local volume box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_bounds: Option<BoundsData>,
    /// Local triangle mesh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_mesh: Option<MeshData>,
}

/// Translation and `[x, y, z, w]` rotation quaternion.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransformData {
    /// World position.
    pub translation: [f64; 3],
    /// Orientation as `[x, y, z, w]`.
    pub rotation: [f64; 4],
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Min and max corners.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundsData {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

/// Triangle mesh arrays. This is also the schema of a standalone global mesh document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f64; 3]>,
    /// Triangles as vertex index triples.
    pub indices: Vec<[u32; 3]>,
    /// Optional per-vertex UVs.
    #[serde(rename = "UVs", default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<[f64; 2]>,
}

impl MeshData {
    /// Validate into a mesh.
    pub fn to_mesh(&self) -> Result<TriangleMesh, GeometryError> {
        TriangleMesh::new(
            self.positions.iter().map(|&p| DVec3::from_array(p)).collect(),
            self.indices.clone(),
            self.uvs.iter().map(|&uv| DVec2::from_array(uv)).collect(),
        )
    }

    fn from_mesh(mesh: &TriangleMesh) -> Self {
        Self {
            positions: mesh.positions().iter().map(|p| p.to_array()).collect(),
            indices: mesh.triangles().to_vec(),
            uvs: mesh.uvs().iter().map(|uv| uv.to_array()).collect(),
        }
    }
}

impl TransformData {
    fn to_pose(self) -> Pose {
        let rotation = DQuat::from_array(self.rotation);
        let rotation = if rotation.length_squared() > f64::EPSILON {
            rotation.normalize()
        } else {
            DQuat::IDENTITY
        };
        Pose::new(DVec3::from_array(self.translation), rotation)
    }

    fn from_pose(pose: &Pose) -> Self {
        Self {
            translation: pose.translation.to_array(),
            rotation: pose.rotation.to_array(),
        }
    }
}

impl AnchorData {
    /// Convert into an anchor.
    pub fn to_anchor(&self) -> Result<Anchor, LoadError> {
        let geometry: AnchorGeometry = if let Some(bounds) = &self.volume_bounds {
            VolumeBounds::new(DVec3::from_array(bounds.min), DVec3::from_array(bounds.max))?.into()
        } else if let Some(outline) = &self.plane_boundary_2d {
            PlaneBoundary::new(outline.iter().map(|&[x, y]| Point::new(x, y)))?.into()
        } else if let Some(mesh) = &self.global_mesh {
            mesh.to_mesh()?.into()
        } else {
            return Err(LoadError::MissingGeometry { uuid: self.uuid });
        };
        Ok(Anchor {
            uuid: self.uuid,
            labels: labels_from_names(&self.semantic_classifications),
            pose: self.transform.to_pose(),
            geometry,
        })
    }

    /// Describe an anchor.
    pub fn from_anchor(anchor: &Anchor) -> Self {
        let mut data = Self {
            uuid: anchor.uuid,
            semantic_classifications: anchor.labels.names().map(str::to_owned).collect(),
            transform: TransformData::from_pose(&anchor.pose),
            plane_boundary_2d: None,
            volume_bounds: None,
            global_mesh: None,
        };
        match &anchor.geometry {
            AnchorGeometry::Plane(plane) => {
                data.plane_boundary_2d = Some(plane.outline().iter().map(|p| [p.x, p.y]).collect());
            }
            AnchorGeometry::Volume(volume) => {
                data.volume_bounds = Some(BoundsData {
                    min: volume.min().to_array(),
                    max: volume.max().to_array(),
                });
            }
            AnchorGeometry::Mesh(mesh) => data.global_mesh = Some(MeshData::from_mesh(mesh)),
        }
        data
    }
}

impl Room {
    /// Describe the room. Bounds are omitted while the room is empty.
    pub fn to_data(&self) -> RoomData {
        let bounds = self.bounds();
        RoomData {
            uuid: self.uuid(),
            bounds: (!bounds.is_empty()).then(|| BoundsData {
                min: bounds.min.to_array(),
                max: bounds.max.to_array(),
            }),
            anchors: self
                .anchors()
                .map(|(_, anchor)| AnchorData::from_anchor(anchor))
                .collect(),
        }
    }

    /// The room document as a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.to_data())
    }

    /// The room document as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_data())
    }

    /// Whether `data` describes the same physical room.
    pub fn corresponds(&self, data: &RoomData) -> bool {
        self.uuid() == data.uuid
    }

    /// Load the global mesh from a standalone [`MeshData`] document.
    ///
    /// Replaces the geometry of the existing global mesh anchor (`Updated`) or adds a new one
    /// (`Created`). On error the room is left untouched.
    pub fn load_global_mesh_from_json_str(&mut self, json: &str) -> Result<AnchorId, LoadError> {
        let mesh = serde_json::from_str::<MeshData>(json)
            .map_err(LoadError::from)
            .and_then(|data| Ok(data.to_mesh()?))
            .inspect_err(|err| warn!(%err, "rejected global mesh"))?;

        if let Some(id) = self.global_mesh() {
            if let Some(mut anchor) = self.anchor(id).cloned() {
                anchor.geometry = mesh.into();
                self.replace_anchor(id, anchor);
                self.compute_room_bounds();
                return Ok(id);
            }
        }
        Ok(self.add_anchor(Anchor::new(
            Uuid::new_v4(),
            AnchorLabels::GLOBAL_MESH,
            Pose::IDENTITY,
            mesh,
        )))
    }
}
