//! # World Constants
//!
//! Defaults used when the embedding application supplies no configuration.

/// Root seed used by the default configuration.
pub const DEFAULT_WORLD_SEED: i64 = 1000;

/// Width/height of a sector in world units.
pub const DEFAULT_SECTOR_SIZE: f64 = 2048.0;

/// Sectors loaded on each side of the focus sector.
pub const DEFAULT_LOAD_RADIUS: i32 = 2;

/// Pending work items processed per simulation tick.
pub const DEFAULT_ITEMS_PER_TICK: usize = 16;

/// Distinct asteroid visuals kept in the visual cache.
pub const DEFAULT_VISUAL_CACHE_CAPACITY: usize = 64;

/// Events buffered per subscriber before new events are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
