//! # Shared Universe
//!
//! The universe itself has no internal locking. Hosts that touch it from
//! several threads share it through this handle:
//!
//! ```text
//! logic thread ──write_handle()──> tick, load_area, destroy_asteroid
//! render thread ──read_handle()──> spawners(), world()
//! ```
//!
//! Many read handles may coexist; a write handle is exclusive.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::universe::{TickReport, Universe};

/// Clonable, thread-safe handle to a `Universe`.
#[derive(Clone)]
pub struct SharedUniverse {
    inner: Arc<RwLock<Universe>>,
}

impl SharedUniverse {
    /// Wraps a universe.
    #[must_use]
    pub fn new(universe: Universe) -> Self {
        Self {
            inner: Arc::new(RwLock::new(universe)),
        }
    }

    /// Shared read access.
    pub fn read_handle(&self) -> RwLockReadGuard<'_, Universe> {
        self.inner.read()
    }

    /// Exclusive write access.
    pub fn write_handle(&self) -> RwLockWriteGuard<'_, Universe> {
        self.inner.write()
    }

    /// Runs one tick under the write lock.
    pub fn tick(&self) -> TickReport {
        self.inner.write().tick()
    }
}
