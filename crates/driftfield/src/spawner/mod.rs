//! # Spawners
//!
//! Turn registered records into live instances and back.
//!
//! ## Lifecycle
//!
//! ```text
//!            spawn(record)                      despawn(id)
//! pool ──acquire──> configure ──> active[id] ──release──> pool
//!                                   │
//!                                   └── spawn(record) again: same instance
//! ```
//!
//! One `EntitySpawner<T>` exists per kind. Instances are owned by the
//! spawner while active and by the pool while inert; callers only ever
//! borrow them.

mod asteroid;
mod field;
mod moon;
mod planet;
mod set;
mod station;
mod visual_cache;

pub use asteroid::{AsteroidBody, AsteroidSpawner};
pub use field::FieldBody;
pub use moon::MoonBody;
pub use planet::{PlanetBody, Satellite};
pub use set::{LiveRef, SpawnerSet};
pub use station::StationBody;
pub use visual_cache::{AsteroidVisual, VisualCache, VisualCacheStats};

use std::collections::HashMap;

use driftfield_core::{InstanceId, ObjectPool, PoolConfig, PoolConfigError, PoolStats, Poolable};
use driftfield_shared::{EntityKind, EntityRecord, RecordId, Vec2, WorldEvent};
use thiserror::Error;

use crate::events::EventSender;

/// Errors that can occur when spawning.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// The record kind does not match the spawner.
    #[error("spawner for {expected} cannot spawn a {found} record")]
    TypeMismatch {
        /// Kind handled by the spawner.
        expected: EntityKind,
        /// Kind of the record.
        found: EntityKind,
    },

    /// The record has no registry id.
    #[error("record is not registered")]
    Unregistered,
}

/// A live instance that can be configured from a record.
pub trait Configurable: Poolable + Sized {
    /// Kind of record this instance represents.
    const KIND: EntityKind;

    /// Builds an inert instance. Used as the pool factory.
    fn inert(instance: InstanceId) -> Self;

    /// Pool-assigned identity, stable across reuse.
    fn instance_id(&self) -> InstanceId;

    /// Record currently represented; `NULL` while inert.
    fn record_id(&self) -> RecordId;

    /// Current world position.
    fn position(&self) -> Vec2;

    /// Applies a record to this instance.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError::TypeMismatch` if the record body is of another kind.
    fn configure(&mut self, record: &EntityRecord) -> Result<(), SpawnError>;

    /// Copies live state that should outlive the instance back into its record.
    fn write_back(&self, record: &mut EntityRecord) {
        record.position = self.position();
    }
}

/// Spawner counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnerStats {
    /// Kind handled.
    pub kind: EntityKind,
    /// Instances currently live.
    pub active: usize,
    /// Successful spawns (idempotent repeats excluded).
    pub spawned: u64,
    /// Successful despawns.
    pub despawned: u64,
    /// Rejected spawn requests.
    pub rejected: u64,
    /// Backing pool counters.
    pub pool: PoolStats,
}

/// Generic spawner for one kind.
pub struct EntitySpawner<T: Configurable> {
    pool: ObjectPool<T>,
    active: HashMap<RecordId, T>,
    events: EventSender,
    spawned: u64,
    despawned: u64,
    rejected: u64,
}

impl<T: Configurable> EntitySpawner<T> {
    /// Creates a spawner with a prewarmed pool.
    ///
    /// # Errors
    ///
    /// Returns `PoolConfigError` if the pool sizing is invalid.
    pub fn new(pool: PoolConfig, events: EventSender) -> Result<Self, PoolConfigError> {
        Ok(Self {
            pool: ObjectPool::new(pool, T::inert)?,
            active: HashMap::new(),
            events,
            spawned: 0,
            despawned: 0,
            rejected: 0,
        })
    }

    /// Spawns (or returns the already live) instance for a record.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError::Unregistered` for a record without id and
    /// `SpawnError::TypeMismatch` for a record of another kind. Nothing is
    /// modified in either case.
    pub fn spawn(&mut self, record: &EntityRecord) -> Result<&T, SpawnError> {
        self.spawn_with(record, |_| {})
    }

    /// Like `spawn`, running `decorate` on a freshly configured instance.
    ///
    /// `decorate` is not called when the instance was already live.
    ///
    /// # Errors
    ///
    /// Same as `spawn`.
    pub fn spawn_with(&mut self, record: &EntityRecord, decorate: impl FnOnce(&mut T)) -> Result<&T, SpawnError> {
        let id = record.id;
        if id.is_null() {
            self.rejected += 1;
            return Err(SpawnError::Unregistered);
        }
        if record.kind() != T::KIND {
            self.rejected += 1;
            return Err(SpawnError::TypeMismatch {
                expected: T::KIND,
                found: record.kind(),
            });
        }
        if self.active.contains_key(&id) {
            return Ok(&self.active[&id]);
        }

        let mut instance = self.pool.acquire();
        if let Err(error) = instance.configure(record) {
            self.pool.release(instance);
            self.rejected += 1;
            return Err(error);
        }
        decorate(&mut instance);

        let kind = T::KIND;
        let position = instance.position();
        tracing::trace!(%id, %kind, instance = instance.instance_id().value(), "spawned");
        self.active.insert(id, instance);
        self.spawned += 1;
        self.events.send(WorldEvent::Spawned { id, kind, position });

        Ok(&self.active[&id])
    }

    /// Returns the live instance of a record to the pool.
    ///
    /// Returns `false` if no instance was live for `id`.
    pub fn despawn(&mut self, id: RecordId) -> bool {
        let Some(instance) = self.active.remove(&id) else {
            return false;
        };

        let kind = T::KIND;
        let outcome = self.pool.release(instance);
        tracing::trace!(%id, %kind, ?outcome, "despawned");
        self.despawned += 1;
        self.events.send(WorldEvent::Despawned { id, kind });
        true
    }

    /// Despawns every live instance in ascending id order.
    ///
    /// Returns how many were despawned.
    pub fn despawn_all(&mut self) -> usize {
        let ids = self.active_ids();
        for &id in &ids {
            self.despawn(id);
        }
        ids.len()
    }

    /// Live instance of a record.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.active.get(&id)
    }

    /// Mutable live instance of a record.
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut T> {
        self.active.get_mut(&id)
    }

    /// Checks if a record has a live instance.
    #[must_use]
    pub fn is_active(&self, id: RecordId) -> bool {
        self.active.contains_key(&id)
    }

    /// Records with a live instance, ascending.
    #[must_use]
    pub fn active_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<_> = self.active.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Live instances, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.active.values()
    }

    /// Live instances, mutable, in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.active.values_mut()
    }

    /// Number of live instances.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> SpawnerStats {
        SpawnerStats {
            kind: T::KIND,
            active: self.active.len(),
            spawned: self.spawned,
            despawned: self.despawned,
            rejected: self.rejected,
            pool: self.pool.stats(),
        }
    }
}

/// Shorthand for the mismatch error of a body type.
pub(crate) fn mismatch<T: Configurable>(record: &EntityRecord) -> SpawnError {
    SpawnError::TypeMismatch {
        expected: T::KIND,
        found: record.kind(),
    }
}
