// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Room basics.
//!
//! Load a room document, inspect the derived structure, and run a few spatial queries.
//!
//! Run:
//! - `cargo run -p understory_demos --example room_basics`
//! - `RUST_LOG=debug cargo run -p understory_demos --example room_basics` to see load and recompute logs.

use glam::DVec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use understory_anchor::{Anchor, AnchorLabels, LabelFilter};
use understory_room::{AnchorEvent, Room, RoomData};

const LIVING_ROOM: &str = include_str!("../data/living_room.json");

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let data = RoomData::from_json_str(LIVING_ROOM).expect("bundled room parses");
    let mut room = Room::default();
    room.subscribe(|event: AnchorEvent, anchor: &Anchor| {
        tracing::info!(?event, labels = ?anchor.labels, "anchor event");
    });
    room.load_from_data(&data);

    let bounds = room.bounds();
    println!("room {} with {} anchors", room.uuid(), room.len());
    println!("bounds: {:?} .. {:?}", bounds.min, bounds.max);
    println!(
        "walls: {} (closed: {}), edge corners: {:?}",
        room.walls().count(),
        room.walls_closed(),
        room.edges()
    );
    assert!(room.walls_closed(), "living room walls form a loop");

    // Containment.
    for p in [DVec3::new(1.0, 1.0, 1.0), DVec3::new(6.0, 1.0, 1.0), DVec3::new(1.0, 1.0, 3.0)] {
        println!(
            "{p}: in room {}, in room (ignoring height) {}",
            room.is_position_in_room(p, true),
            room.is_position_in_room(p, false)
        );
    }

    // Look down at the coffee table, then at whatever is behind it.
    let eye = DVec3::new(2.5, 0.8, 1.6);
    let down = DVec3::new(0.0, 1.0, -1.2);
    for hit in room.raycast_all(eye, down, 0.0, LabelFilter::ALL) {
        let labels = room.anchor(hit.anchor).map(|a| a.labels);
        println!("ray hit {labels:?} at {} ({:.2} m)", hit.hit.point, hit.hit.distance);
    }
    let nearest = room
        .raycast(eye, down, 0.0, LabelFilter::excluding(AnchorLabels::TABLE))
        .expect("the floor is always behind the table");
    println!("first non-table hit: {}", nearest.hit.point);

    let probe = DVec3::new(4.6, 2.0, 1.0);
    if let Some(closest) = room.try_get_closest_surface_position(probe, LabelFilter::ALL, 0.0) {
        println!(
            "closest surface to {probe}: {} at {:.2} m",
            closest.point, closest.distance
        );
    }

    if let Some(key) = room.key_wall(0.1) {
        println!("key wall: {:?}", room.anchor(key).map(|a| a.uuid));
    }
    if let Some(largest) = room.largest_surface(AnchorLabels::TABLE | AnchorLabels::COUCH) {
        println!("largest furniture top: {:?}", room.anchor(largest).map(|a| a.labels));
    }

    let mut rng = StdRng::seed_from_u64(42);
    match room.generate_random_position_in_room_from_rng(&mut rng, 0.5, true) {
        Some(p) => println!("random free position: {p}"),
        None => println!("no free position found"),
    }

    let json = room.to_json_string().expect("room serializes");
    println!("round-tripped document is {} bytes", json.len());
}
