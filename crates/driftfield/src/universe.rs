//! # Universe
//!
//! Composition root. A `Universe` owns the sector generator, the record
//! registry, one spawner per kind, the event bus and the deferred work queue.
//!
//! ## Streaming
//!
//! ```text
//! load_area(pos) ──> WorkQueue ──tick()──> GenerateSector ──> register_all ──> Spawn
//!                                     └──> Spawn ──> SpawnerSet
//! unload_sector(coord): write back live state, despawn, keep records
//! ```
//!
//! A sector is generated at most once per universe. Records outlive their
//! instances: unloading only despawns, and loading a generated sector again
//! respawns from the stored records.

use std::collections::HashSet;
use std::path::Path;

use driftfield_procedural::{
    FragmentPatternGenerator, GenerationError, SectorGenerator, StarfieldGenerator, WorldSeed,
};
use driftfield_shared::{EntityKind, RecordId, SectorCoord, Vec2, WorldEvent};
use driftfield_world::WorldData;

use crate::config::WorldConfig;
use crate::error::DriftResult;
use crate::events::{EventBus, EventReceiver, EventSender};
use crate::scheduler::{PendingWork, WorkQueue};
use crate::spawner::SpawnerSet;

/// Sector hook a universe can own.
pub type BoxedGenerator = Box<dyn SectorGenerator + Send + Sync>;

/// What one pass of work did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number.
    pub tick: u64,
    /// Sectors generated and registered.
    pub sectors_generated: usize,
    /// Sectors whose generation failed.
    pub sectors_failed: usize,
    /// Records registered.
    pub records_registered: usize,
    /// Instances spawned.
    pub spawned: usize,
    /// Spawn requests rejected.
    pub rejected: usize,
    /// Work items left in the queue.
    pub pending: usize,
}

/// A deterministic, streamed universe.
pub struct Universe {
    config: WorldConfig,
    generator: BoxedGenerator,
    fragments: FragmentPatternGenerator,
    world: WorldData,
    spawners: SpawnerSet,
    bus: EventBus,
    events: EventSender,
    queue: WorkQueue,
    generated: HashSet<SectorCoord>,
    tick: u64,
}

impl Universe {
    /// Creates a universe with the starfield generator.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::Config` if the configuration is invalid.
    pub fn new(config: WorldConfig) -> DriftResult<Self> {
        config.validate()?;
        let generator = StarfieldGenerator::new(
            WorldSeed::new(config.seed),
            config.sector_size,
            config.starfield.clone(),
        )?;
        Self::with_generator(config, Box::new(generator))
    }

    /// Creates a universe with a custom sector hook.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::Config` if the configuration is invalid.
    pub fn with_generator(config: WorldConfig, generator: BoxedGenerator) -> DriftResult<Self> {
        config.validate()?;
        let bus = EventBus::new(config.events.capacity);
        let events = bus.sender();

        Ok(Self {
            fragments: FragmentPatternGenerator::new(config.fragments.clone())?,
            spawners: SpawnerSet::new(&config, &events)?,
            generator,
            world: WorldData::new(),
            bus,
            events,
            queue: WorkQueue::new(),
            generated: HashSet::new(),
            tick: 0,
            config,
        })
    }

    /// Creates a universe around an existing registry.
    ///
    /// Every sector holding a record counts as generated.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::Config` if the configuration is invalid.
    pub fn from_world(config: WorldConfig, world: WorldData) -> DriftResult<Self> {
        let mut universe = Self::new(config)?;
        universe.generated = world.sectors().collect();
        universe.world = world;
        Ok(universe)
    }

    /// Loads a compressed dump written by `save`.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the dump cannot be read.
    pub fn load(config: WorldConfig, path: impl AsRef<Path>) -> DriftResult<Self> {
        Self::from_world(config, WorldData::load_compressed(path)?)
    }

    /// Restores a universe from a JSON dump.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the dump is malformed.
    pub fn from_json(config: WorldConfig, json: &str) -> DriftResult<Self> {
        Self::from_world(config, WorldData::from_json(json)?)
    }

    /// Subscribes to world events.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    /// Handle for publishing events alongside the universe.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Sector containing a world position.
    #[must_use]
    pub fn sector_of(&self, position: Vec2) -> SectorCoord {
        SectorCoord::from_world_pos(position, self.config.sector_size)
    }

    /// Queues everything needed around a world position.
    ///
    /// Missing sectors are queued for generation; records of generated
    /// sectors without a live instance are queued for spawning. Returns
    /// how many items were queued.
    pub fn load_area(&mut self, focus: Vec2) -> usize {
        let center = self.sector_of(focus);
        let mut queued = 0;

        for coord in area(center, self.config.load_radius) {
            if !self.generated.contains(&coord) {
                queued += usize::from(self.queue.push(PendingWork::GenerateSector(coord)));
                continue;
            }
            for record in self.world.query_by_sector(coord) {
                if !self.spawners.is_active(record.kind(), record.id) {
                    queued += usize::from(self.queue.push(PendingWork::Spawn(record.id)));
                }
            }
        }

        tracing::debug!(%center, queued, pending = self.queue.len(), "area requested");
        queued
    }

    /// Processes up to `scheduler.items_per_tick` queued items.
    ///
    /// Records of a freshly generated sector are queued for spawning.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        self.world.set_tick(self.tick);

        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        for work in self.queue.drain(self.config.scheduler.items_per_tick) {
            match work {
                PendingWork::GenerateSector(coord) => {
                    for id in self.generate_sector(coord, &mut report) {
                        self.queue.push(PendingWork::Spawn(id));
                    }
                }
                PendingWork::Spawn(id) => self.spawn_record(id, &mut report),
            }
        }

        report.pending = self.queue.len();
        report
    }

    /// Ticks until the queue is empty. Returns the summed report.
    pub fn flush(&mut self) -> TickReport {
        let mut total = TickReport::default();
        loop {
            let report = self.tick();
            total.tick = report.tick;
            total.sectors_generated += report.sectors_generated;
            total.sectors_failed += report.sectors_failed;
            total.records_registered += report.records_registered;
            total.spawned += report.spawned;
            total.rejected += report.rejected;
            if report.pending == 0 {
                return total;
            }
        }
    }

    /// Generates and registers the `2r x 2r` block around `focus` now,
    /// without spawning.
    ///
    /// Sectors already generated are skipped. Failures are isolated per
    /// sector and counted in the report.
    pub fn generate_around_focus(&mut self, focus: SectorCoord, radius: i32) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };
        for coord in area(focus, radius) {
            self.generate_sector(coord, &mut report);
        }
        report.pending = self.queue.len();
        report
    }

    /// Despawns every instance of a sector, writing live state back first.
    ///
    /// Records stay registered under their home sector. Returns how many
    /// instances were despawned.
    pub fn unload_sector(&mut self, coord: SectorCoord) -> usize {
        let ids = self.world.ids_in_sector(coord);
        let mut despawned = 0;

        for &id in &ids {
            let spawners = &self.spawners;
            let kind = self.world.modify(id, |record| {
                spawners.write_back(record);
                record.kind()
            });
            if let Some(kind) = kind {
                despawned += usize::from(self.spawners.despawn(kind, id));
            }
        }
        self.queue.forget_spawns(&ids.into_iter().collect());

        if despawned > 0 {
            tracing::debug!(%coord, despawned, "sector unloaded");
        }
        despawned
    }

    /// Unloads every sector and drops pending work.
    pub fn unload_all(&mut self) -> usize {
        self.queue.cancel();
        let sectors: Vec<_> = self.world.sectors().collect();
        sectors.into_iter().map(|coord| self.unload_sector(coord)).sum()
    }

    /// Drops pending work. Work already processed keeps its effects.
    pub fn cancel_pending(&mut self) -> usize {
        self.queue.cancel()
    }

    /// Breaks an asteroid into fragments.
    ///
    /// Live motion is written back before the pattern is applied. The
    /// parent is despawned and unregistered, the fragments are registered
    /// with fresh ids, and `WorldEvent::Fragmented` is emitted. Fragments
    /// are spawned only if the parent was live; otherwise they wait as
    /// records for the next `load_area`. An unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::Generation` if the record is not an asteroid;
    /// nothing is modified in that case.
    pub fn destroy_asteroid(&mut self, id: RecordId) -> DriftResult<Vec<RecordId>> {
        match self.world.get(id) {
            None => return Ok(Vec::new()),
            Some(record) if record.kind() != EntityKind::Asteroid => {
                return Err(GenerationError::TypeMismatch {
                    expected: EntityKind::Asteroid,
                    found: record.kind(),
                }
                .into());
            }
            Some(_) => {}
        }

        let spawners = &self.spawners;
        let Some(source) = self.world.modify(id, |record| {
            spawners.write_back(record);
            record.clone()
        }) else {
            return Ok(Vec::new());
        };
        let children = self.fragments.generate(&source)?;

        let was_live = self.spawners.despawn(EntityKind::Asteroid, id);
        self.world.unregister(id);
        self.queue.forget_spawns(&HashSet::from([id]));

        let ids = self.world.register_all(children)?;
        if was_live {
            for &child in &ids {
                if let Some(record) = self.world.get(child) {
                    self.spawners.spawn(record)?;
                }
            }
        }

        tracing::debug!(parent = %id, children = ids.len(), was_live, "asteroid destroyed");
        self.events.send(WorldEvent::Fragmented {
            parent: id,
            children: ids.clone(),
        });
        Ok(ids)
    }

    /// Writes the live state of every instance back into its record.
    pub fn sync_records(&mut self) {
        let ids: Vec<_> = self.world.iter().map(|record| record.id).collect();
        for id in ids {
            let spawners = &self.spawners;
            self.world.modify(id, |record| spawners.write_back(record));
        }
    }

    /// Serializes the registry to JSON, live state included.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::World` if encoding fails.
    pub fn snapshot_json(&mut self) -> DriftResult<String> {
        self.sync_records();
        Ok(self.world.to_json()?)
    }

    /// Writes a compressed dump, live state included.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::World` if encoding or writing fails.
    pub fn save(&mut self, path: impl AsRef<Path>) -> DriftResult<()> {
        self.sync_records();
        self.world.save_compressed(path)?;
        Ok(())
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Record registry.
    #[must_use]
    pub const fn world(&self) -> &WorldData {
        &self.world
    }

    /// Spawners.
    #[must_use]
    pub const fn spawners(&self) -> &SpawnerSet {
        &self.spawners
    }

    /// Spawners, mutable. Used by hosts that move live instances.
    pub fn spawners_mut(&mut self) -> &mut SpawnerSet {
        &mut self.spawners
    }

    /// Ticks processed so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Queued work items.
    #[must_use]
    pub fn pending_work(&self) -> usize {
        self.queue.len()
    }

    /// Checks if a sector was generated.
    #[must_use]
    pub fn is_generated(&self, coord: SectorCoord) -> bool {
        self.generated.contains(&coord)
    }

    /// Number of generated sectors.
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    fn generate_sector(&mut self, coord: SectorCoord, report: &mut TickReport) -> Vec<RecordId> {
        if self.generated.contains(&coord) {
            return Vec::new();
        }

        let records = match self.generator.generate_one(coord) {
            Ok(records) => records,
            Err(failure) => {
                tracing::warn!(%coord, error = %failure.error, "sector generation failed");
                report.sectors_failed += 1;
                self.events.send(WorldEvent::SectorFailed {
                    coord,
                    reason: failure.error.to_string(),
                });
                return Vec::new();
            }
        };

        // Whatever registers stays registered, so the sector is never retried.
        self.generated.insert(coord);
        match self.world.register_all(records) {
            Ok(ids) => {
                report.sectors_generated += 1;
                report.records_registered += ids.len();
                self.events.send(WorldEvent::SectorGenerated {
                    coord,
                    records: ids.len(),
                });
                ids
            }
            Err(error) => {
                tracing::warn!(%coord, %error, "sector registration failed");
                report.sectors_failed += 1;
                self.events.send(WorldEvent::SectorFailed {
                    coord,
                    reason: error.to_string(),
                });
                Vec::new()
            }
        }
    }

    fn spawn_record(&mut self, id: RecordId, report: &mut TickReport) {
        let Some(record) = self.world.get(id) else {
            return;
        };
        match self.spawners.spawn(record) {
            Ok(_) => report.spawned += 1,
            Err(error) => {
                tracing::warn!(%id, %error, "spawn rejected");
                report.rejected += 1;
            }
        }
    }
}

/// Sectors of the `2r x 2r` block around `center`, row-major.
fn area(center: SectorCoord, radius: i32) -> impl Iterator<Item = SectorCoord> {
    (-radius..radius).flat_map(move |dy| (-radius..radius).filter_map(move |dx| center.checked_offset(dx, dy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriftError;
    use driftfield_shared::{
        AsteroidData, EntityRecord, PlanetCategory, PlanetData, PlanetTheme, RecordBody, SizeClass,
    };

    fn small_config() -> WorldConfig {
        WorldConfig {
            load_radius: 1,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_area_order() {
        let coords: Vec<_> = area(SectorCoord::new(0, 0), 1).collect();
        assert_eq!(
            coords,
            vec![
                SectorCoord::new(-1, -1),
                SectorCoord::new(0, -1),
                SectorCoord::new(-1, 0),
                SectorCoord::new(0, 0),
            ]
        );
        assert_eq!(area(SectorCoord::new(0, 0), 0).count(), 0);
    }

    #[test]
    fn test_load_area_generates_then_spawns() {
        let mut universe = Universe::new(small_config()).unwrap();
        assert_eq!(universe.load_area(Vec2::new(10.0, 10.0)), 4);

        let report = universe.flush();
        assert_eq!(report.sectors_generated, 4);
        assert_eq!(report.spawned, universe.world().len());
        assert_eq!(universe.spawners().active_count(), universe.world().len());
        assert_eq!(universe.pending_work(), 0);

        // Everything is live; nothing left to queue.
        assert_eq!(universe.load_area(Vec2::new(10.0, 10.0)), 0);
    }

    #[test]
    fn test_sector_generated_once() {
        let mut universe = Universe::new(small_config()).unwrap();
        universe.generate_around_focus(SectorCoord::new(0, 0), 1);
        let count = universe.world().len();

        let again = universe.generate_around_focus(SectorCoord::new(0, 0), 1);
        assert_eq!(again.sectors_generated, 0);
        assert_eq!(universe.world().len(), count);
        assert_eq!(universe.generated_count(), 4);
    }

    #[test]
    fn test_destroy_non_asteroid_is_rejected() {
        let mut universe = Universe::new(small_config()).unwrap();
        let planet = universe
            .world
            .register(EntityRecord::new(
                5,
                SectorCoord::new(0, 0),
                Vec2::new(300.0, 300.0),
                RecordBody::Planet(PlanetData {
                    category: PlanetCategory::Terran,
                    theme: PlanetTheme::Frozen,
                    radius: 90.0,
                    moons: Vec::new(),
                }),
            ))
            .unwrap();
        let before = universe.world().get(planet).cloned();

        let result = universe.destroy_asteroid(planet);
        assert!(matches!(
            result,
            Err(DriftError::Generation(GenerationError::TypeMismatch {
                expected: EntityKind::Asteroid,
                found: EntityKind::Planet,
            }))
        ));
        assert_eq!(universe.world().len(), 1);
        assert_eq!(universe.world().get(planet).cloned(), before);
    }

    #[test]
    fn test_load_area_at_grid_edge_skips_outside_sectors() {
        let config = WorldConfig {
            load_radius: 2,
            ..WorldConfig::default()
        };
        let mut universe = Universe::new(config).unwrap();
        assert_eq!(universe.sector_of(Vec2::new(1e300, 0.0)).x, i32::MAX);

        // Columns past i32::MAX are dropped: 3 of 4 per row, 4 rows.
        assert_eq!(universe.load_area(Vec2::new(1e300, 0.0)), 12);
        assert_eq!(universe.pending_work(), 12);
    }

    #[test]
    fn test_destroy_unknown_is_noop() {
        let mut universe = Universe::new(small_config()).unwrap();
        assert!(universe.destroy_asteroid(RecordId::new(999)).unwrap().is_empty());
    }

    #[test]
    fn test_destroy_large_asteroid() {
        let mut universe = Universe::new(small_config()).unwrap();
        let events = universe.subscribe();

        let mut world = WorldData::new();
        let parent = world
            .register(EntityRecord::new(
                77,
                SectorCoord::new(0, 0),
                Vec2::new(100.0, 100.0),
                RecordBody::Asteroid(AsteroidData::new(SizeClass::Large)),
            ))
            .unwrap();
        universe.world = world;
        universe.generated.insert(SectorCoord::new(0, 0));
        let record = universe.world().get(parent).cloned().unwrap();
        universe.spawners_mut().spawn(&record).unwrap();

        let children = universe.destroy_asteroid(parent).unwrap();
        assert_eq!(children.len(), 2);
        assert!(!universe.world().contains(parent));
        assert!(!universe.spawners().is_active(EntityKind::Asteroid, parent));
        assert!(children.iter().all(|&id| universe.spawners().is_active(EntityKind::Asteroid, id)));
        assert!(events
            .drain()
            .iter()
            .any(|e| matches!(e, WorldEvent::Fragmented { parent: p, .. } if *p == parent)));
    }

    #[test]
    fn test_destroy_unloaded_asteroid_leaves_fragments_as_records() {
        let mut universe = Universe::new(small_config()).unwrap();
        let parent = universe
            .world
            .register(EntityRecord::new(
                78,
                SectorCoord::new(0, 0),
                Vec2::new(100.0, 100.0),
                RecordBody::Asteroid(AsteroidData::new(SizeClass::Large)),
            ))
            .unwrap();
        universe.generated.insert(SectorCoord::new(0, 0));

        let children = universe.destroy_asteroid(parent).unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|&id| universe.world().contains(id)));
        assert_eq!(universe.spawners().active_count(), 0);

        universe.load_area(Vec2::new(100.0, 100.0));
        universe.flush();
        assert!(children.iter().all(|&id| universe.spawners().is_active(EntityKind::Asteroid, id)));
    }
}
