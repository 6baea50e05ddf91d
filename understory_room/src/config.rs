// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for derived room structure and sampling.

use serde::{Deserialize, Serialize};
use understory_anchor::AnchorLabels;

/// Room tunables.
///
/// Deserializes from a partial document; missing keys take their defaults.
///
/// ```
/// use understory_room::RoomConfig;
///
/// let config: RoomConfig = serde_json::from_str(r#"{ "seat_width": 0.5 }"#).unwrap();
/// assert_eq!(config.seat_width, 0.5);
/// assert_eq!(config.max_sample_attempts, 1000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Largest XY gap, in meters, between consecutive wall endpoints that still counts as connected.
    pub wall_connection_tolerance: f64,
    /// Rejection-sampling budget of random position generation.
    pub max_sample_attempts: u32,
    /// Width of one seat, in meters, when splitting seat anchors into seats.
    pub seat_width: f64,
    /// Labels whose anchors provide seats.
    #[serde(with = "crate::data::label_names")]
    pub seat_labels: AnchorLabels,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            wall_connection_tolerance: 0.1,
            max_sample_attempts: 1000,
            seat_width: 0.6,
            seat_labels: AnchorLabels::SEATS,
        }
    }
}
