//! # Object Pool
//!
//! Reusable cache for live instances that are frequently spawned and despawned.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Identity of a constructed instance.
///
/// Assigned by the pool at construction time and kept for the whole life of
/// the object, including every trip through the free list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Creates an instance ID from its raw serial.
    #[inline]
    #[must_use]
    pub const fn new(serial: u64) -> Self {
        Self(serial)
    }

    /// Returns the raw serial.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Where an instance currently lives with respect to its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolState {
    /// Handed out by `acquire` and counted as active.
    Active,
    /// Sitting in the free list, inert.
    Pooled,
    /// Handed out past the hard limit; not tracked by the pool.
    Overflow,
}

/// Capability required from anything stored in an [`ObjectPool`].
pub trait Poolable {
    /// Returns the pool flag of this instance.
    fn pool_state(&self) -> PoolState;

    /// Sets the pool flag of this instance.
    fn set_pool_state(&mut self, state: PoolState);

    /// Returns the instance to an inert state.
    ///
    /// Called on release, before the instance enters the free list.
    fn reset(&mut self);
}

/// Sizing rules for a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Instances constructed up front.
    pub initial_size: usize,
    /// How many slots are added each time the pool grows.
    pub grow_step: usize,
    /// Hard limit on tracked instances (and on the free list).
    pub max_size: usize,
}

impl PoolConfig {
    /// Checks the sizing rules.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_size` or `grow_step` is zero, or if
    /// `initial_size` exceeds `max_size`.
    pub fn validate(&self) -> Result<(), PoolConfigError> {
        if self.max_size == 0 {
            return Err(PoolConfigError::ZeroMaxSize);
        }
        if self.grow_step == 0 {
            return Err(PoolConfigError::ZeroGrowStep);
        }
        if self.initial_size > self.max_size {
            return Err(PoolConfigError::InitialExceedsMax {
                initial: self.initial_size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 16,
            grow_step: 16,
            max_size: 256,
        }
    }
}

/// Invalid pool sizing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolConfigError {
    /// `max_size` must be at least one.
    #[error("pool max_size must be greater than zero")]
    ZeroMaxSize,

    /// `grow_step` must be at least one.
    #[error("pool grow_step must be greater than zero")]
    ZeroGrowStep,

    /// More instances requested up front than the pool may ever hold.
    #[error("pool initial_size {initial} exceeds max_size {max}")]
    InitialExceedsMax {
        /// Requested initial size.
        initial: usize,
        /// Configured hard limit.
        max: usize,
    },
}

/// What `release` did with an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Reset and stored in the free list.
    Pooled,
    /// Dropped: overflow instance, or the free list was full.
    Destroyed,
    /// The instance was already flagged as pooled; nothing changed.
    Ignored,
}

/// Pool counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Tracked instances currently handed out.
    pub active: usize,
    /// Instances waiting in the free list.
    pub free: usize,
    /// Overflow instances currently handed out.
    pub overflow_active: usize,
    /// Current soft capacity.
    pub capacity: usize,
    /// Instances ever constructed.
    pub constructed: u64,
    /// Instances dropped by the pool.
    pub destroyed: u64,
    /// Tracked acquisitions.
    pub acquired: u64,
    /// Successful releases of tracked instances.
    pub released: u64,
    /// Overflow instances ever handed out.
    pub overflow_total: u64,
    /// Number of growth steps taken.
    pub grow_events: u64,
}

/// A pool of reusable instances.
///
/// Instances are constructed by a factory, handed out by value and given
/// back with [`ObjectPool::release`]. Ownership moves in and out of the pool,
/// so an instance can never be reachable from the free list and from the
/// caller at the same time.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use it from the simulation thread only.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = ObjectPool::new(PoolConfig::default(), Rock::inert)?;
///
/// // Acquire - O(1) when the free list is warm
/// let rock = pool.acquire();
///
/// // Release - O(1), instance is reset and kept for reuse
/// pool.release(rock);
/// ```
pub struct ObjectPool<T: Poolable> {
    /// Inert instances ready for reuse.
    free: Vec<T>,
    /// Sizing rules.
    config: PoolConfig,
    /// Current soft capacity (grows toward `config.max_size`).
    capacity: usize,
    /// Builds a fresh inert instance.
    factory: fn(InstanceId) -> T,
    /// Next serial handed to the factory.
    next_serial: u64,
    /// Counters.
    stats: PoolStats,
}

impl<T: Poolable> ObjectPool<T> {
    /// Creates a pool and constructs `initial_size` instances up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PoolConfig, factory: fn(InstanceId) -> T) -> Result<Self, PoolConfigError> {
        config.validate()?;

        let mut pool = Self {
            free: Vec::with_capacity(config.initial_size),
            config,
            capacity: config.initial_size,
            factory,
            next_serial: 0,
            stats: PoolStats::default(),
        };

        for _ in 0..config.initial_size {
            let mut item = pool.construct();
            item.set_pool_state(PoolState::Pooled);
            pool.free.push(item);
        }

        Ok(pool)
    }

    /// Returns the sizing rules.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the current soft capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of tracked instances currently handed out.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.stats.active
    }

    /// Returns the number of instances in the free list.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Returns a snapshot of the pool counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            free: self.free.len(),
            capacity: self.capacity,
            ..self.stats
        }
    }

    /// Hands out an instance.
    ///
    /// Order of preference:
    /// 1. Pop the free list
    /// 2. Construct while under the soft capacity
    /// 3. Grow the capacity by `grow_step` (up to `max_size`) and construct
    /// 4. At `max_size`: construct an untracked overflow instance
    ///
    /// Never fails and never blocks.
    pub fn acquire(&mut self) -> T {
        if let Some(mut item) = self.free.pop() {
            item.set_pool_state(PoolState::Active);
            self.stats.active += 1;
            self.stats.acquired += 1;
            return item;
        }

        if self.stats.active >= self.capacity {
            if self.capacity < self.config.max_size {
                let grown = (self.capacity + self.config.grow_step).min(self.config.max_size);
                debug!(from = self.capacity, to = grown, "object pool grew");
                self.capacity = grown;
                self.stats.grow_events += 1;
            } else {
                let mut item = self.construct();
                item.set_pool_state(PoolState::Overflow);
                self.stats.overflow_active += 1;
                self.stats.overflow_total += 1;
                warn!(
                    max_size = self.config.max_size,
                    overflow_active = self.stats.overflow_active,
                    "object pool at hard limit, handing out untracked overflow instance"
                );
                return item;
            }
        }

        let mut item = self.construct();
        item.set_pool_state(PoolState::Active);
        self.stats.active += 1;
        self.stats.acquired += 1;
        item
    }

    /// Gives an instance back.
    ///
    /// - Already pooled: ignored, guards the free list against double release
    /// - Overflow: dropped
    /// - Active: reset, then kept unless the free list is full
    pub fn release(&mut self, mut item: T) -> ReleaseOutcome {
        match item.pool_state() {
            PoolState::Pooled => {
                debug!("ignored release of an instance already flagged as pooled");
                ReleaseOutcome::Ignored
            }
            PoolState::Overflow => {
                self.stats.overflow_active = self.stats.overflow_active.saturating_sub(1);
                self.stats.destroyed += 1;
                ReleaseOutcome::Destroyed
            }
            PoolState::Active => {
                self.stats.active = self.stats.active.saturating_sub(1);
                self.stats.released += 1;
                item.reset();

                if self.free.len() >= self.config.max_size {
                    self.stats.destroyed += 1;
                    return ReleaseOutcome::Destroyed;
                }

                item.set_pool_state(PoolState::Pooled);
                self.free.push(item);
                ReleaseOutcome::Pooled
            }
        }
    }

    /// Drops every instance in the free list.
    pub fn clear_free(&mut self) {
        self.stats.destroyed += self.free.len() as u64;
        self.free.clear();
    }

    /// Builds a fresh instance with the next serial.
    fn construct(&mut self) -> T {
        let id = InstanceId::new(self.next_serial);
        self.next_serial += 1;
        self.stats.constructed += 1;
        (self.factory)(id)
    }
}
