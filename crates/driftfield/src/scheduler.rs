//! # Deferred Work
//!
//! Sector generation and spawning are queued by `load_area` and processed a
//! bounded number of items per tick, in FIFO order. A queued item is never
//! queued twice.

use std::collections::{HashSet, VecDeque};

use driftfield_shared::{RecordId, SectorCoord};

/// A unit of deferred work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PendingWork {
    /// Generate and register the content of a sector.
    GenerateSector(SectorCoord),
    /// Spawn the live instance of a registered record.
    Spawn(RecordId),
}

/// Deduplicated FIFO of pending work.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: VecDeque<PendingWork>,
    queued: HashSet<PendingWork>,
}

impl WorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item unless it is already queued.
    ///
    /// Returns `true` if the item was added.
    pub fn push(&mut self, work: PendingWork) -> bool {
        if !self.queued.insert(work) {
            return false;
        }
        self.items.push_back(work);
        true
    }

    /// Removes up to `limit` items from the front.
    pub fn drain(&mut self, limit: usize) -> Vec<PendingWork> {
        let count = limit.min(self.items.len());
        let batch: Vec<_> = self.items.drain(..count).collect();
        for work in &batch {
            self.queued.remove(work);
        }
        batch
    }

    /// Drops every pending item. Returns how many were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        self.queued.clear();
        dropped
    }

    /// Drops pending spawns of the given records.
    pub fn forget_spawns(&mut self, ids: &HashSet<RecordId>) {
        self.items.retain(|work| !matches!(work, PendingWork::Spawn(id) if ids.contains(id)));
        self.queued
            .retain(|work| !matches!(work, PendingWork::Spawn(id) if ids.contains(id)));
    }

    /// Checks if an item is pending.
    #[must_use]
    pub fn contains(&self, work: &PendingWork) -> bool {
        self.queued.contains(work)
    }

    /// Number of pending items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
