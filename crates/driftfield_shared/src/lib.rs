//! # DRIFTFIELD Shared
//!
//! Common types used by generators, the registry, spawners and persistence.
//!
//! ## CRITICAL RULE
//!
//! Records are descriptions, not instances. Nothing in this crate may hold a
//! reference to a live instance, and every record must survive a trip
//! through a world dump unchanged.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod events;
pub mod math;
pub mod record;
pub mod sector;

pub use constants::{DEFAULT_SECTOR_SIZE, DEFAULT_WORLD_SEED};
pub use events::WorldEvent;
pub use math::Vec2;
pub use record::{
    AsteroidData, AsteroidFieldData, Commodity, EntityKind, EntityRecord, MoonData, PlanetCategory,
    PlanetData, PlanetTheme, PriceQuote, RecordBody, RecordId, SizeClass, StationData, StationType,
};
pub use sector::SectorCoord;
