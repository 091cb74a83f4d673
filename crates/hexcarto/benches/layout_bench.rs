//! End-to-end layout of a synthetic constituency cloud (~650 seats) with
//! the default UK tables.

use criterion::{criterion_group, criterion_main, Criterion};
use hexcarto::api::{layout_projected, Entity, LayoutCfg, Region};
use hexcarto::entity::ProjectedPoint;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seats per region, roughly the 2024 apportionment, around rough centres.
const REGIONS: [(Region, usize, f64, f64, f64); 12] = [
    (Region::NorthernIreland, 18, -0.09, 0.03, 0.015),
    (Region::Scotland, 57, -0.01, -0.02, 0.04),
    (Region::NorthEast, 27, 0.02, 0.035, 0.01),
    (Region::NorthWest, 73, 0.0, 0.06, 0.012),
    (Region::Yorkshire, 54, 0.03, 0.06, 0.012),
    (Region::Wales, 32, -0.01, 0.1, 0.015),
    (Region::WestMidlands, 57, 0.02, 0.095, 0.01),
    (Region::EastMidlands, 47, 0.045, 0.09, 0.012),
    (Region::East, 61, 0.08, 0.105, 0.014),
    (Region::SouthWest, 58, 0.0, 0.13, 0.02),
    (Region::London, 75, 0.07, 0.12, 0.004),
    (Region::SouthEast, 91, 0.07, 0.135, 0.016),
];

fn synthetic_cloud() -> (Vec<ProjectedPoint>, Vec<Entity>) {
    let mut rng = StdRng::seed_from_u64(650);
    let mut points = Vec::new();
    let mut entities = Vec::new();
    for (region, seats, cx, cy, spread) in REGIONS {
        for k in 0..seats {
            let idx = entities.len();
            entities.push(Entity::new(format!("{region}-{k}"), format!("{region} {k}"), region));
            points.push(ProjectedPoint::new(
                idx,
                region,
                cx + rng.gen_range(-spread..spread),
                cy + rng.gen_range(-spread..spread),
            ));
        }
    }
    (points, entities)
}

fn bench_layout(c: &mut Criterion) {
    let (points, entities) = synthetic_cloud();
    let cfg = LayoutCfg::default();
    let mut group = c.benchmark_group("layout");
    group.sample_size(10);
    group.bench_function("uk_like_650", |b| {
        b.iter(|| layout_projected(&points, &entities, &cfg))
    });
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
