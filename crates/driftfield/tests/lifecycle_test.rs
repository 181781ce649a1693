//! # Lifecycle Integration Test
//!
//! Drives a `Universe` through generation, spawning, unloading, destruction
//! and save/load, checking records, instances and events stay consistent.

#![allow(missing_docs)]
#![allow(dead_code)]

use std::path::PathBuf;

use driftfield::procedural::{GenerationError, SectorGenerator};
use driftfield::shared::{
    AsteroidData, EntityKind, EntityRecord, RecordBody, RecordId, SectorCoord, SizeClass, Vec2, WorldEvent,
};
use driftfield::world::WorldData;
use driftfield::{SpawnError, Universe, WorldConfig};

fn config(load_radius: i32) -> WorldConfig {
    WorldConfig {
        load_radius,
        ..WorldConfig::default()
    }
}

fn temp_dump_path(tag: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("driftfield_{tag}_{id}.dump"))
}

/// One large asteroid per sector; a chosen sector fails.
struct RockPerSector {
    fail_at: SectorCoord,
    sector_size: f64,
}

impl SectorGenerator for RockPerSector {
    fn generate_sector(&mut self, x: i32, y: i32) -> Result<Vec<EntityRecord>, GenerationError> {
        let coord = SectorCoord::new(x, y);
        if coord == self.fail_at {
            return Err(GenerationError::Hook {
                coord,
                reason: "corrupt sector".into(),
            });
        }
        Ok(vec![EntityRecord::new(
            i64::from(x) * 1_000 + i64::from(y),
            coord,
            coord.center(self.sector_size),
            RecordBody::Asteroid(AsteroidData::new(SizeClass::Large)),
        )])
    }
}

fn single_asteroid_world(seed: i64) -> (WorldData, RecordId) {
    let mut data = AsteroidData::new(SizeClass::Large);
    data.velocity = Vec2::new(3.0, -1.0);
    let mut world = WorldData::new();
    let id = world
        .register(EntityRecord::new(
            seed,
            SectorCoord::new(0, 0),
            Vec2::new(512.0, 256.0),
            RecordBody::Asteroid(data),
        ))
        .unwrap();
    (world, id)
}

/// Test: spawning the same record twice yields one instance and one event.
#[test]
fn test_spawn_twice_same_instance() {
    let (world, id) = single_asteroid_world(42);
    let mut universe = Universe::from_world(config(1), world).unwrap();
    let events = universe.subscribe();
    let record = universe.world().get(id).unwrap().clone();

    let first = universe.spawners_mut().spawn(&record).unwrap().instance_id();
    let second = universe.spawners_mut().spawn(&record).unwrap().instance_id();

    assert_eq!(first, second);
    let spawned = events
        .drain()
        .into_iter()
        .filter(|e| matches!(e, WorldEvent::Spawned { id: spawned, .. } if *spawned == id))
        .count();
    assert_eq!(spawned, 1);
}

/// Test: a spawner for another kind refuses the record and changes nothing.
#[test]
fn test_type_mismatch_has_no_effect() {
    let (world, id) = single_asteroid_world(42);
    let mut universe = Universe::from_world(config(1), world).unwrap();
    let events = universe.subscribe();
    let record = universe.world().get(id).unwrap().clone();
    let before = universe.spawners().planets.stats();

    let result = universe.spawners_mut().planets.spawn(&record).map(|_| ());

    assert_eq!(
        result,
        Err(SpawnError::TypeMismatch {
            expected: EntityKind::Planet,
            found: EntityKind::Asteroid,
        })
    );
    let after = universe.spawners().planets.stats();
    assert_eq!(after.pool, before.pool);
    assert_eq!(after.active, 0);
    assert!(!events.has_events());
}

/// Test: destroying the same asteroid in a reloaded universe gives the same fragments.
#[test]
fn test_fragmentation_reproduces_after_reload() {
    let (world, id) = single_asteroid_world(-1_258_979_128_755_286_016);
    let json = world.to_json().unwrap();

    let fragments = |json: &str| {
        let mut universe = Universe::from_json(config(1), json).unwrap();
        let children = universe.destroy_asteroid(id).unwrap();
        children
            .iter()
            .map(|&child| {
                let record = universe.world().get(child).unwrap();
                let data = record.as_asteroid().unwrap();
                (record.seed, record.position, data.velocity, data.size_class, data.fragment_of)
            })
            .collect::<Vec<_>>()
    };

    let first = fragments(&json);
    let second = fragments(&json);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].3, SizeClass::Medium);
    assert_eq!(first[1].3, SizeClass::Small);
    assert!(first.iter().all(|f| f.4 == Some(id)));
}

/// Test: destroying fragments down to small asteroids ends the chain.
#[test]
fn test_fragmentation_chain_terminates() {
    let (world, id) = single_asteroid_world(5);
    let mut universe = Universe::from_world(config(1), world).unwrap();

    let mut pending = vec![id];
    let mut destroyed = 0;
    while let Some(next) = pending.pop() {
        pending.extend(universe.destroy_asteroid(next).unwrap());
        destroyed += 1;
    }

    // Large -> Medium + Small -> (Small + Small) + Small
    assert_eq!(destroyed, 1 + 2 + 2);
    assert!(universe.world().is_empty());
    assert_eq!(universe.spawners().active_count(), 0);
}

/// Test: a failing sector is reported while its neighbours load.
#[test]
fn test_failing_sector_is_isolated() {
    let bad = SectorCoord::new(0, -1);
    let config = config(2);
    let generator = RockPerSector {
        fail_at: bad,
        sector_size: config.sector_size,
    };
    let mut universe = Universe::with_generator(config, Box::new(generator)).unwrap();
    let events = universe.subscribe();

    universe.load_area(Vec2::new(1.0, 1.0));
    let report = universe.flush();

    assert_eq!(report.sectors_failed, 1);
    assert_eq!(report.sectors_generated, 15);
    assert_eq!(universe.world().len(), 15);
    assert_eq!(universe.spawners().asteroids.active_count(), 15);
    assert!(!universe.is_generated(bad));

    let failures: Vec<_> = events
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            WorldEvent::SectorFailed { coord, reason } => Some((coord, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, bad);
    assert!(failures[0].1.contains("corrupt sector"));
}

/// Test: unloading keeps records and their live motion; reloading respawns them.
#[test]
fn test_unload_writes_back_and_reload_respawns() {
    let config = config(1);
    let generator = RockPerSector {
        fail_at: SectorCoord::new(99, 99),
        sector_size: config.sector_size,
    };
    let sector_size = config.sector_size;
    let mut universe = Universe::with_generator(config, Box::new(generator)).unwrap();

    universe.load_area(Vec2::new(1.0, 1.0));
    universe.flush();

    let home = SectorCoord::new(0, 0);
    let id = universe.world().ids_in_sector(home)[0];
    let moved = Vec2::new(-100.0, -100.0);
    {
        let rock = universe.spawners_mut().asteroids.get_mut(id).unwrap();
        rock.position = moved;
        rock.velocity = Vec2::new(1.0, 1.0);
    }

    assert_eq!(universe.unload_sector(home), 1);
    assert!(!universe.spawners().asteroids.is_active(id));

    let record = universe.world().get(id).unwrap();
    assert_eq!(record.position, moved);
    assert_eq!(record.sector, home, "records keep their home sector");
    assert_eq!(record.as_asteroid().unwrap().velocity, Vec2::new(1.0, 1.0));

    assert_eq!(universe.load_area(home.center(sector_size)), 1);
    universe.flush();
    assert_eq!(universe.spawners().asteroids.get(id).unwrap().position, moved);
    assert_eq!(universe.world().len(), 4, "sectors are never regenerated");
}

/// Test: cancelled work has no effect; processed work keeps its effect.
#[test]
fn test_cancel_pending_work() {
    let mut config = config(2);
    config.scheduler.items_per_tick = 3;
    let mut universe = Universe::new(config).unwrap();

    assert_eq!(universe.load_area(Vec2::ZERO), 16);
    let report = universe.tick();
    assert_eq!(report.sectors_generated + report.sectors_failed, 3);

    let dropped = universe.cancel_pending();
    assert!(dropped >= 13);
    assert_eq!(universe.generated_count(), 3);

    assert_eq!(universe.flush().sectors_generated, 0);
    assert_eq!(universe.spawners().active_count(), 0);
}

/// Test: save, load and keep going from the same state.
#[test]
fn test_save_and_load_compressed() {
    let path = temp_dump_path("universe");
    let mut universe = Universe::new(config(2)).unwrap();
    universe.load_area(Vec2::ZERO);
    universe.flush();
    universe.save(&path).unwrap();

    let mut restored = Universe::load(config(2), &path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.world().snapshot(), universe.world().snapshot());
    restored.world().verify_indices().unwrap();

    restored.load_area(Vec2::ZERO);
    let report = restored.flush();
    assert_eq!(report.records_registered, 0);
    assert_eq!(report.spawned, restored.world().len());
    assert_eq!(restored.world().next_id(), universe.world().next_id());
}

/// Test: unload_all despawns everything but keeps every record.
#[test]
fn test_unload_all() {
    let mut universe = Universe::new(config(2)).unwrap();
    universe.load_area(Vec2::ZERO);
    universe.flush();
    let live = universe.spawners().active_count();
    let records = universe.world().len();

    assert_eq!(universe.unload_all(), live);
    assert_eq!(universe.spawners().active_count(), 0);
    assert_eq!(universe.world().len(), records);
}
