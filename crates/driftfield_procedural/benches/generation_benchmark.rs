//! Benchmark for seed derivation and sector generation.
//!
//! TARGET: a 4x4 focus area well under one frame (16ms)
//!
//! Run with: cargo bench --package driftfield_procedural --bench generation_benchmark

#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use driftfield_procedural::{
    derive_seed, FragmentPatternGenerator, SectorGenerator, StarfieldGenerator, StarfieldProfile, WorldSeed,
};
use driftfield_shared::{SectorCoord, SizeClass};

fn benchmark_derive_seed(c: &mut Criterion) {
    c.bench_function("derive_seed_with_context", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            black_box(derive_seed(black_box(1000), x, -x, "asteroid_3"))
        });
    });
}

fn benchmark_focus_area(c: &mut Criterion) {
    let mut generator =
        StarfieldGenerator::new(WorldSeed::new(1000), 2048.0, StarfieldProfile::default()).unwrap();

    let mut group = c.benchmark_group("focus_area");
    group.throughput(Throughput::Elements(16));

    group.bench_function("radius_2_sectors", |b| {
        let mut focus = 0i32;
        b.iter(|| {
            focus += 4;
            black_box(generator.generate_around_focus(SectorCoord::new(focus, 0), 2))
        });
    });

    group.finish();
}

fn benchmark_fragment_pattern(c: &mut Criterion) {
    let generator = FragmentPatternGenerator::default();

    c.bench_function("fragment_pattern_large", |b| {
        let mut seed = 0i64;
        b.iter(|| {
            seed += 1;
            black_box(generator.pattern(black_box(seed), SizeClass::Large))
        });
    });
}

criterion_group!(
    benches,
    benchmark_derive_seed,
    benchmark_focus_area,
    benchmark_fragment_pattern,
);
criterion_main!(benches);
