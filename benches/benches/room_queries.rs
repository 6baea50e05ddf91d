// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::DVec3;
use kurbo::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_anchor::{Anchor, AnchorLabels, LabelFilter, PlaneBoundary, Pose, VolumeBounds};
use understory_room::{Room, RoomData};
use uuid::Uuid;

fn wall(id: u128, start: DVec3, end: DVec3, h: f64) -> Anchor {
    let run = end - start;
    let w = run.length();
    Anchor::new(
        Uuid::from_u128(id),
        AnchorLabels::WALL_FACE,
        Pose::from_surface_normal(((start + end) * 0.5).with_z(h * 0.5), run.cross(DVec3::Z)),
        PlaneBoundary::from_rect(Rect::new(-w * 0.5, -h * 0.5, w * 0.5, h * 0.5)),
    )
}

/// A square room of side `2n` meters furnished with an `n x n` grid of tables.
fn gen_furnished_room(n: usize) -> Room {
    let side = 2.0 * n as f64;
    let h = 2.5;
    let mut room = Room::default();
    room.add_anchor(Anchor::new(
        Uuid::from_u128(1),
        AnchorLabels::FLOOR,
        Pose::IDENTITY,
        PlaneBoundary::from_rect(Rect::new(0.0, 0.0, side, side)),
    ));
    room.add_anchor(Anchor::new(
        Uuid::from_u128(2),
        AnchorLabels::CEILING,
        Pose::from_surface_normal(DVec3::new(0.0, 0.0, h), DVec3::NEG_Z),
        PlaneBoundary::from_rect(Rect::new(-side, 0.0, 0.0, side)),
    ));
    let corners = [
        DVec3::new(side, 0.0, 0.0),
        DVec3::ZERO,
        DVec3::new(0.0, side, 0.0),
        DVec3::new(side, side, 0.0),
    ];
    for i in 0..4 {
        room.add_anchor(wall(10 + i as u128, corners[i], corners[(i + 1) % 4], h));
    }
    let top = VolumeBounds::new(DVec3::new(-0.5, -0.4, 0.0), DVec3::new(0.5, 0.4, 0.75))
        .expect("valid table bounds");
    for y in 0..n {
        for x in 0..n {
            let center = DVec3::new(2.0 * x as f64 + 1.0, 2.0 * y as f64 + 1.0, 0.0);
            room.add_anchor(Anchor::new(
                Uuid::from_u128(1000 + (y * n + x) as u128),
                AnchorLabels::TABLE,
                Pose::from_translation(center),
                top,
            ));
        }
    }
    room.recompute();
    room
}

fn gen_probes(room: &Room, count: usize, seed: u64) -> Vec<DVec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let b = room.bounds();
    (0..count)
        .map(|_| {
            DVec3::new(
                rng.gen_range(b.min.x..=b.max.x),
                rng.gen_range(b.min.y..=b.max.y),
                rng.gen_range(b.min.z..=b.max.z),
            )
        })
        .collect()
}

fn bench_room_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("room_queries");
    for &n in &[4usize, 16] {
        let room = gen_furnished_room(n);
        let probes = gen_probes(&room, 256, 0xA11CE);
        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_function(format!("raycast_down_n{}", n), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for &p in &probes {
                    hits += room
                        .raycast(p, DVec3::NEG_Z, 0.0, LabelFilter::ALL)
                        .is_some() as usize;
                }
                black_box(hits);
            });
        });

        group.bench_function(format!("closest_surface_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0.0;
                for &p in &probes {
                    if let Some(c) = room.try_get_closest_surface_position(p, LabelFilter::ALL, 0.0)
                    {
                        total += c.distance;
                    }
                }
                black_box(total);
            });
        });

        group.bench_function(format!("in_room_and_volume_n{}", n), |b| {
            b.iter(|| {
                let mut inside = 0usize;
                for &p in &probes {
                    if room.is_position_in_room(p, true)
                        && room.is_position_in_scene_volume(p, true, 0.0).is_none()
                    {
                        inside += 1;
                    }
                }
                black_box(inside);
            });
        });

        group.bench_function(format!("random_position_n{}", n), |b| {
            b.iter_batched(
                || StdRng::seed_from_u64(9),
                |mut rng| {
                    black_box(room.generate_random_position_in_room_from_rng(&mut rng, 0.3, true));
                },
                BatchSize::SmallInput,
            );
        });

        let data: RoomData = room.to_data();
        group.bench_function(format!("load_from_data_n{}", n), |b| {
            b.iter_batched(
                Room::default,
                |mut fresh| {
                    fresh.load_from_data(&data);
                    black_box(fresh.walls_closed());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_room_queries);
criterion_main!(benches);
