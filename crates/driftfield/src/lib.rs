//! # DRIFTFIELD
//!
//! Deterministic procedural space and the lifecycle of everything in it.
//!
//! ## Architecture
//!
//! ```text
//! load_area ──> WorkQueue ──tick──> SectorGenerator ──records──> WorldData
//!                                                                   │
//!                       EventBus <── Spawned/Despawned ── SpawnerSet <┘
//!                                                             │
//! destroy_asteroid ──> FragmentPatternGenerator ──> register ─┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML configuration
//! - `events`: World event fan-out
//! - `scheduler`: Deferred sector generation and spawning
//! - `spawner`: Pooled live instances per kind
//! - `universe`: Composition root
//! - `sync`: Cross-thread handle
//!
//! ## Example
//!
//! ```rust,ignore
//! use driftfield::{Universe, WorldConfig};
//! use driftfield_shared::Vec2;
//!
//! let mut universe = Universe::new(WorldConfig::from_file("driftfield.toml")?)?;
//! let events = universe.subscribe();
//!
//! universe.load_area(Vec2::new(0.0, 0.0));
//! universe.flush();
//!
//! for event in events.drain() {
//!     println!("{event:?}");
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod spawner;
pub mod sync;
pub mod universe;

pub use driftfield_core as core;
pub use driftfield_procedural as procedural;
pub use driftfield_shared as shared;
pub use driftfield_world as world;

pub use config::{ConfigError, WorldConfig};
pub use error::{DriftError, DriftResult};
pub use events::{EventBus, EventReceiver, EventSender};
pub use scheduler::{PendingWork, WorkQueue};
pub use spawner::{
    AsteroidBody, AsteroidSpawner, Configurable, EntitySpawner, LiveRef, SpawnError, SpawnerSet, SpawnerStats,
};
pub use sync::SharedUniverse;
pub use universe::{BoxedGenerator, TickReport, Universe};
