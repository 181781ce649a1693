//! One spawner per kind behind a single dispatch point.

use driftfield_core::PoolConfigError;
use driftfield_shared::{EntityKind, EntityRecord, RecordId};

use super::{
    AsteroidBody, AsteroidSpawner, Configurable, EntitySpawner, FieldBody, MoonBody, PlanetBody, SpawnError,
    SpawnerStats, StationBody,
};
use crate::config::WorldConfig;
use crate::events::EventSender;

/// Borrowed live instance of any kind.
#[derive(Clone, Copy, Debug)]
pub enum LiveRef<'a> {
    /// Asteroid
    Asteroid(&'a AsteroidBody),
    /// Asteroid field
    AsteroidField(&'a FieldBody),
    /// Planet
    Planet(&'a PlanetBody),
    /// Moon
    Moon(&'a MoonBody),
    /// Station
    Station(&'a StationBody),
}

impl LiveRef<'_> {
    /// Kind of the instance.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Asteroid(_) => EntityKind::Asteroid,
            Self::AsteroidField(_) => EntityKind::AsteroidField,
            Self::Planet(_) => EntityKind::Planet,
            Self::Moon(_) => EntityKind::Moon,
            Self::Station(_) => EntityKind::Station,
        }
    }

    /// Record represented by the instance.
    #[must_use]
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::Asteroid(body) => body.record_id(),
            Self::AsteroidField(body) => body.record_id(),
            Self::Planet(body) => body.record_id(),
            Self::Moon(body) => body.record_id(),
            Self::Station(body) => body.record_id(),
        }
    }

    /// Pool identity of the instance.
    #[must_use]
    pub fn instance_id(&self) -> driftfield_core::InstanceId {
        match self {
            Self::Asteroid(body) => body.instance_id(),
            Self::AsteroidField(body) => body.instance_id(),
            Self::Planet(body) => body.instance_id(),
            Self::Moon(body) => body.instance_id(),
            Self::Station(body) => body.instance_id(),
        }
    }
}

/// Every spawner of a universe.
pub struct SpawnerSet {
    /// Asteroids, with visuals.
    pub asteroids: AsteroidSpawner,
    /// Asteroid fields.
    pub fields: EntitySpawner<FieldBody>,
    /// Planets.
    pub planets: EntitySpawner<PlanetBody>,
    /// Free-standing moons.
    pub moons: EntitySpawner<MoonBody>,
    /// Stations.
    pub stations: EntitySpawner<StationBody>,
}

impl SpawnerSet {
    /// Builds every spawner from one pool config.
    ///
    /// # Errors
    ///
    /// Returns `PoolConfigError` if the pool sizing is invalid.
    pub fn new(config: &WorldConfig, events: &EventSender) -> Result<Self, PoolConfigError> {
        Ok(Self {
            asteroids: AsteroidSpawner::new(config.pool, config.visuals.cache_capacity, events.clone())?,
            fields: EntitySpawner::new(config.pool, events.clone())?,
            planets: EntitySpawner::new(config.pool, events.clone())?,
            moons: EntitySpawner::new(config.pool, events.clone())?,
            stations: EntitySpawner::new(config.pool, events.clone())?,
        })
    }

    /// Spawns a record with the spawner of its kind.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError::Unregistered` for a record without id.
    pub fn spawn(&mut self, record: &EntityRecord) -> Result<LiveRef<'_>, SpawnError> {
        Ok(match record.kind() {
            EntityKind::Asteroid => LiveRef::Asteroid(self.asteroids.spawn(record)?),
            EntityKind::AsteroidField => LiveRef::AsteroidField(self.fields.spawn(record)?),
            EntityKind::Planet => LiveRef::Planet(self.planets.spawn(record)?),
            EntityKind::Moon => LiveRef::Moon(self.moons.spawn(record)?),
            EntityKind::Station => LiveRef::Station(self.stations.spawn(record)?),
        })
    }

    /// Despawns the live instance of a record of the given kind.
    pub fn despawn(&mut self, kind: EntityKind, id: RecordId) -> bool {
        match kind {
            EntityKind::Asteroid => self.asteroids.despawn(id),
            EntityKind::AsteroidField => self.fields.despawn(id),
            EntityKind::Planet => self.planets.despawn(id),
            EntityKind::Moon => self.moons.despawn(id),
            EntityKind::Station => self.stations.despawn(id),
        }
    }

    /// Live instance of a record of the given kind.
    #[must_use]
    pub fn get(&self, kind: EntityKind, id: RecordId) -> Option<LiveRef<'_>> {
        match kind {
            EntityKind::Asteroid => self.asteroids.get(id).map(LiveRef::Asteroid),
            EntityKind::AsteroidField => self.fields.get(id).map(LiveRef::AsteroidField),
            EntityKind::Planet => self.planets.get(id).map(LiveRef::Planet),
            EntityKind::Moon => self.moons.get(id).map(LiveRef::Moon),
            EntityKind::Station => self.stations.get(id).map(LiveRef::Station),
        }
    }

    /// Checks if a record of the given kind has a live instance.
    #[must_use]
    pub fn is_active(&self, kind: EntityKind, id: RecordId) -> bool {
        self.get(kind, id).is_some()
    }

    /// Copies live state of a record's instance back into the record.
    ///
    /// Returns `false` if the record has no live instance.
    pub fn write_back(&self, record: &mut EntityRecord) -> bool {
        let id = record.id;
        match record.kind() {
            EntityKind::Asteroid => self.asteroids.get(id).map(|body| body.write_back(record)),
            EntityKind::AsteroidField => self.fields.get(id).map(|body| body.write_back(record)),
            EntityKind::Planet => self.planets.get(id).map(|body| body.write_back(record)),
            EntityKind::Moon => self.moons.get(id).map(|body| body.write_back(record)),
            EntityKind::Station => self.stations.get(id).map(|body| body.write_back(record)),
        }
        .is_some()
    }

    /// Despawns everything. Returns how many instances were despawned.
    pub fn despawn_all(&mut self) -> usize {
        self.asteroids.despawn_all()
            + self.fields.despawn_all()
            + self.planets.despawn_all()
            + self.moons.despawn_all()
            + self.stations.despawn_all()
    }

    /// Live instances across every kind.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.asteroids.active_count()
            + self.fields.active_count()
            + self.planets.active_count()
            + self.moons.active_count()
            + self.stations.active_count()
    }

    /// Counters per kind, in `EntityKind::ALL` order.
    #[must_use]
    pub fn stats(&self) -> Vec<SpawnerStats> {
        EntityKind::ALL
            .iter()
            .map(|kind| match kind {
                EntityKind::Asteroid => self.asteroids.stats(),
                EntityKind::AsteroidField => self.fields.stats(),
                EntityKind::Planet => self.planets.stats(),
                EntityKind::Moon => self.moons.stats(),
                EntityKind::Station => self.stations.stats(),
            })
            .collect()
    }
}
