// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement.
//!
//! Find seats, place content from raycasts with each positioning method, and plan furniture.
//!
//! Run:
//! - `cargo run -p understory_demos --example room_placement`

use std::collections::HashMap;

use glam::DVec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use understory_anchor::{AnchorLabels, LabelFilter};
use understory_room::{
    PositioningMethod, Room, RoomData, ScalingMode, SpawnAsset, SpawnGroup, SpawnSource,
};

const LIVING_ROOM: &str = include_str!("../data/living_room.json");

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let mut room = Room::default();
    room.load_from_data(&RoomData::from_json_str(LIVING_ROOM).expect("bundled room parses"));

    // Seats on the couch, facing into the room.
    for seat in room.seats() {
        println!(
            "seat at {} facing {}",
            seat.pose.translation,
            seat.pose.forward()
        );
    }
    let eye = DVec3::new(2.5, 0.5, 1.6);
    if let Some(seat) = room.try_get_closest_seat_pose(eye, DVec3::new(0.4, 1.0, -0.4)) {
        println!("looking right of center picks the seat at {}", seat.pose.translation);
    }

    // Put something on the coffee table three ways.
    let toward_table = DVec3::new(0.0, 1.0, -1.0);
    for method in [
        PositioningMethod::Default,
        PositioningMethod::Center,
        PositioningMethod::Edge,
    ] {
        if let Some(placed) = room.get_best_pose_from_raycast(
            eye,
            toward_table,
            0.0,
            LabelFilter::including(AnchorLabels::TABLE),
            method,
        ) {
            println!(
                "{method:?}: at {} facing {}",
                placed.pose.translation,
                placed.pose.forward()
            );
        }
    }

    // Hang something on the wall behind the viewer.
    if let Some(placed) = room.get_best_pose_from_raycast(
        eye,
        DVec3::NEG_Y,
        0.0,
        LabelFilter::including(AnchorLabels::WALLS),
        PositioningMethod::Default,
    ) {
        println!("wall mount at {} facing {}", placed.pose.translation, placed.pose.forward());
    }

    // Plan furniture: real assets for couches and tables, procedural for the rest.
    let mut groups = HashMap::new();
    groups.insert(
        AnchorLabels::COUCH,
        SpawnGroup {
            assets: vec![SpawnAsset {
                name: "sofa_modern".into(),
                size: DVec3::new(2.2, 0.9, 0.8),
            }],
            scaling: ScalingMode::UniformXyScale,
        },
    );
    groups.insert(
        AnchorLabels::TABLE,
        SpawnGroup {
            assets: vec![
                SpawnAsset {
                    name: "table_oak".into(),
                    size: DVec3::new(1.2, 0.7, 0.45),
                },
                SpawnAsset {
                    name: "table_glass".into(),
                    size: DVec3::new(1.0, 0.6, 0.4),
                },
            ],
            scaling: ScalingMode::Stretch,
        },
    );
    let mut rng = StdRng::seed_from_u64(7);
    for item in room.plan_interior_from_rng(&mut rng, &groups, true) {
        let what = match &item.source {
            SpawnSource::Asset(name) => name.as_str(),
            SpawnSource::Procedural => "procedural",
        };
        println!(
            "{what:>12} at {} scale {}",
            item.pose.translation, item.scale
        );
    }
}
