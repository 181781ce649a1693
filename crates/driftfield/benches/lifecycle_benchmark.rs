//! Benchmark for the spawn/despawn cycle and area streaming.
//!
//! TARGET: pooled spawn + despawn well under a microsecond
//!
//! Run with: cargo bench --package driftfield --bench lifecycle_benchmark

#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use driftfield::shared::{AsteroidData, EntityRecord, RecordBody, RecordId, SectorCoord, SizeClass, Vec2};
use driftfield::{AsteroidSpawner, EventBus, Universe, WorldConfig};

fn asteroid(id: u64) -> EntityRecord {
    let mut record = EntityRecord::new(
        id as i64,
        SectorCoord::new(0, 0),
        Vec2::new(id as f64, 0.0),
        RecordBody::Asteroid(AsteroidData::new(SizeClass::Medium)),
    );
    record.id = RecordId::new(id);
    record
}

fn benchmark_spawn_cycle(c: &mut Criterion) {
    let bus = EventBus::new(16);
    let config = WorldConfig::default();
    let mut asteroids =
        AsteroidSpawner::new(config.pool, config.visuals.cache_capacity, bus.sender()).unwrap();
    let records: Vec<_> = (1..=64).map(asteroid).collect();

    let mut group = c.benchmark_group("spawn_cycle");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("spawn_despawn_64", |b| {
        b.iter(|| {
            for record in &records {
                black_box(asteroids.spawn(record).is_ok());
            }
            black_box(asteroids.despawn_all())
        });
    });

    group.finish();
}

fn benchmark_integrate(c: &mut Criterion) {
    let bus = EventBus::new(16);
    let mut asteroids = AsteroidSpawner::new(WorldConfig::default().pool, 64, bus.sender()).unwrap();
    for record in (1..=256).map(asteroid) {
        asteroids.spawn(&record).unwrap();
    }

    c.bench_function("integrate_256_asteroids", |b| {
        b.iter(|| {
            for body in asteroids.iter_mut() {
                body.integrate(black_box(1.0 / 60.0));
            }
        });
    });
}

fn benchmark_load_area(c: &mut Criterion) {
    c.bench_function("load_area_radius_2", |b| {
        b.iter_batched(
            || Universe::new(WorldConfig::default()).unwrap(),
            |mut universe| {
                universe.load_area(Vec2::ZERO);
                black_box(universe.flush())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_spawn_cycle, benchmark_integrate, benchmark_load_area);
criterion_main!(benches);
