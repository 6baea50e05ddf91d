// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall UVs.
//!
//! Compute seamless and metric texture coordinates for the walls of a room.
//!
//! Run:
//! - `cargo run -p understory_demos --example wall_uvs`

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use understory_room::{Room, RoomData, TexCoordMode};

const LIVING_ROOM: &str = include_str!("../data/living_room.json");

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let mut room = Room::default();
    room.load_from_data(&RoomData::from_json_str(LIVING_ROOM).expect("bundled room parses"));

    let layouts =
        room.compute_wall_mesh_uv_adjustments(&[TexCoordMode::Seamless, TexCoordMode::Metric]);
    for (layout, link) in layouts.iter().zip(room.wall_links()) {
        let seamless = layout.plane_uvs[0];
        println!(
            "wall {:?} (reversed: {}): U offset {:.3}, U per meter {:.3}",
            layout.anchor, link.reversed, seamless.offset.x, seamless.scale.x
        );
        println!("  seamless outline UVs: {:?}", layout.vertex_uvs[0]);
        println!("  metric outline UVs:   {:?}", layout.vertex_uvs[1]);
    }
}
