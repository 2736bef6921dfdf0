//! Benchmarks for the CPU-side generators.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy_gen::galaxy::sample_particle;
use galaxy_gen::{generate_galaxy, generate_stars, GalaxyParams};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn bench_galaxy(c: &mut Criterion) {
    let mut group = c.benchmark_group("galaxy");

    for count in [10_000u32, 100_000, 500_000] {
        let params = GalaxyParams::default().with_count(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &params, |b, params| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| black_box(generate_galaxy(params, &mut rng)))
        });
    }

    group.bench_function("sample_particle", |b| {
        let params = GalaxyParams::default();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(sample_particle(i, &params, &mut rng))
        })
    });

    group.finish();
}

fn bench_stars(c: &mut Criterion) {
    let mut group = c.benchmark_group("stars");

    for stars in [25_000u32, 250_000] {
        let params = GalaxyParams::default().with_stars(stars);
        group.bench_with_input(BenchmarkId::from_parameter(stars), &params, |b, params| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| black_box(generate_stars(params, &mut rng)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_galaxy, bench_stars);
criterion_main!(benches);
