//! # DRIFTFIELD World
//!
//! The single source of truth for what exists in the universe.
//!
//! ## Design Principles
//!
//! 1. **Records, not instances** - the registry owns descriptions only
//! 2. **Partitioned lookups** - by sector and by kind, proportional to the partition
//! 3. **One-step updates** - canonical map and indices never diverge
//! 4. **Dumpable** - the whole world is a keyed JSON object
//!
//! ## Example
//!
//! ```rust,ignore
//! use driftfield_world::WorldData;
//!
//! let mut world = WorldData::new();
//! let id = world.register(record)?;
//!
//! for record in world.query_by_sector(SectorCoord::new(0, 0)) {
//!     spawners.spawn(record)?;
//! }
//!
//! world.save_compressed("universe.dump")?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod persistence;
pub mod registry;

pub use error::{WorldError, WorldResult};
pub use persistence::{WorldSnapshot, SNAPSHOT_VERSION};
pub use registry::WorldData;
