//! Criterion benches for the assignment solver.
//!
//! - Dense uniform random square matrices (16, 64, 256).
//! - Rectangular point-to-cell problems shaped like a layout run
//!   (few rows, many candidate columns, squared-distance costs).
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hexcarto::lapjv::{solve, solve_rect, DenseCost, SolverCfg};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_dense(dim: usize, seed: u64) -> DenseCost {
    let mut rng = StdRng::seed_from_u64(seed);
    DenseCost::from_fn(dim, |_, _| rng.gen_range(0.0..100.0))
}

fn bench_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("lapjv_dense");
    for dim in [16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, &dim| {
            b.iter_batched(
                || random_dense(dim, 42 + dim as u64),
                |m| solve(&m, SolverCfg::default()),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("lapjv_points_to_cells");
    group.sample_size(20);
    for (rows, cols) in [(50usize, 400usize), (200, 1200)] {
        let mut rng = StdRng::seed_from_u64(7);
        let pts: Vec<Vector2<f64>> = (0..rows)
            .map(|_| Vector2::new(rng.gen_range(0.0..30.0), rng.gen_range(0.0..40.0)))
            .collect();
        let side = (cols as f64).sqrt().ceil() as usize;
        let cells: Vec<Vector2<f64>> = (0..cols)
            .map(|k| Vector2::new((k % side) as f64, (k / side) as f64) * (40.0 / side as f64))
            .collect();
        group.bench_function(BenchmarkId::new("rect", format!("{rows}x{cols}")), |b| {
            b.iter(|| {
                solve_rect(
                    rows,
                    cols,
                    |i, j| (pts[i] - cells[j]).norm_squared(),
                    SolverCfg::default(),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dense, bench_rect);
criterion_main!(benches);
