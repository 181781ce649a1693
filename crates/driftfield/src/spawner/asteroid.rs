//! Asteroid instances.

use std::sync::Arc;

use driftfield_core::{InstanceId, PoolConfig, PoolConfigError, PoolState, Poolable};
use driftfield_shared::{EntityKind, EntityRecord, RecordBody, RecordId, SizeClass, Vec2};

use super::visual_cache::{AsteroidVisual, VisualCache, VisualCacheStats};
use super::{mismatch, Configurable, EntitySpawner, SpawnError, SpawnerStats};
use crate::events::EventSender;

/// Live asteroid.
#[derive(Clone, Debug)]
pub struct AsteroidBody {
    instance: InstanceId,
    state: PoolState,
    record: RecordId,
    /// Record seed.
    pub seed: i64,
    /// World position.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Current rotation in radians.
    pub rotation: f64,
    /// Angular velocity in radians per second.
    pub angular_velocity: f64,
    /// Mass.
    pub mass: f64,
    /// Size class.
    pub size_class: SizeClass,
    /// Collision radius, scale applied.
    pub radius: f64,
    /// Collision outline, if the record baked one.
    pub collision_polygon: Option<Vec<Vec2>>,
    /// Shared presentation data.
    pub visual: Option<Arc<AsteroidVisual>>,
}

impl AsteroidBody {
    /// Advances position and rotation by `dt` seconds.
    pub fn integrate(&mut self, dt: f64) {
        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;
    }
}

impl Poolable for AsteroidBody {
    fn pool_state(&self) -> PoolState {
        self.state
    }

    fn set_pool_state(&mut self, state: PoolState) {
        self.state = state;
    }

    fn reset(&mut self) {
        *self = Self {
            state: self.state,
            ..Self::inert(self.instance)
        };
    }
}

impl Configurable for AsteroidBody {
    const KIND: EntityKind = EntityKind::Asteroid;

    fn inert(instance: InstanceId) -> Self {
        Self {
            instance,
            state: PoolState::Pooled,
            record: RecordId::NULL,
            seed: 0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            mass: 0.0,
            size_class: SizeClass::Small,
            radius: 0.0,
            collision_polygon: None,
            visual: None,
        }
    }

    fn instance_id(&self) -> InstanceId {
        self.instance
    }

    fn record_id(&self) -> RecordId {
        self.record
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn configure(&mut self, record: &EntityRecord) -> Result<(), SpawnError> {
        let RecordBody::Asteroid(data) = &record.body else {
            return Err(mismatch::<Self>(record));
        };

        self.record = record.id;
        self.seed = record.seed;
        self.position = record.position;
        self.velocity = data.velocity;
        self.rotation = 0.0;
        self.angular_velocity = data.angular_velocity;
        self.mass = data.mass;
        self.size_class = data.size_class;
        self.radius = data.size_class.radius() * record.scale;
        self.collision_polygon.clone_from(&data.collision_polygon);
        Ok(())
    }

    fn write_back(&self, record: &mut EntityRecord) {
        record.position = self.position;
        if let Some(data) = record.as_asteroid_mut() {
            data.velocity = self.velocity;
            data.angular_velocity = self.angular_velocity;
        }
    }
}

/// Asteroid spawner with seeded visuals.
pub struct AsteroidSpawner {
    inner: EntitySpawner<AsteroidBody>,
    visuals: VisualCache,
}

impl AsteroidSpawner {
    /// Creates an asteroid spawner.
    ///
    /// # Errors
    ///
    /// Returns `PoolConfigError` if the pool sizing is invalid.
    pub fn new(pool: PoolConfig, visual_capacity: usize, events: EventSender) -> Result<Self, PoolConfigError> {
        Ok(Self {
            inner: EntitySpawner::new(pool, events)?,
            visuals: VisualCache::new(visual_capacity),
        })
    }

    /// Spawns an asteroid and attaches its visual.
    ///
    /// # Errors
    ///
    /// Same as `EntitySpawner::spawn`.
    pub fn spawn(&mut self, record: &EntityRecord) -> Result<&AsteroidBody, SpawnError> {
        let visuals = &mut self.visuals;
        let seed = record.seed;
        self.inner
            .spawn_with(record, |body| body.visual = Some(visuals.get_or_build(seed)))
    }

    /// Returns an asteroid to the pool.
    pub fn despawn(&mut self, id: RecordId) -> bool {
        self.inner.despawn(id)
    }

    /// Despawns every asteroid.
    pub fn despawn_all(&mut self) -> usize {
        self.inner.despawn_all()
    }

    /// Live asteroid of a record.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&AsteroidBody> {
        self.inner.get(id)
    }

    /// Mutable live asteroid of a record.
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut AsteroidBody> {
        self.inner.get_mut(id)
    }

    /// Checks if a record has a live asteroid.
    #[must_use]
    pub fn is_active(&self, id: RecordId) -> bool {
        self.inner.is_active(id)
    }

    /// Live asteroids, mutable.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AsteroidBody> + '_ {
        self.inner.iter_mut()
    }

    /// Number of live asteroids.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.active_count()
    }

    /// Spawner counters.
    #[must_use]
    pub fn stats(&self) -> SpawnerStats {
        self.inner.stats()
    }

    /// Visual cache counters.
    #[must_use]
    pub fn visual_stats(&self) -> VisualCacheStats {
        self.visuals.stats()
    }

    /// Shared spawner for generic access.
    #[must_use]
    pub fn spawner(&self) -> &EntitySpawner<AsteroidBody> {
        &self.inner
    }
}
