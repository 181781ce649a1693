//! # DRIFTFIELD Procedural Generation
//!
//! Deterministic universe generation for infinite, reproducible space.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same root seed always produces the same universe
//! 2. **Sectored**: The universe is generated in fixed-size square sectors
//! 3. **Isolated**: A failing sector is reported, its neighbours still generate
//! 4. **Pure**: Generators produce records, never live instances
//!
//! ## Core Components
//!
//! - `derive_seed`: FNV-1a seed derivation from `(root, x, y, context)`
//! - `SectorGenerator`: Hook trait plus focus-area batching
//! - `StarfieldGenerator`: The default sector hook
//! - `FragmentPatternGenerator`: Breaks asteroids into smaller ones
//!
//! ## Example
//!
//! ```rust,ignore
//! use driftfield_procedural::{SectorGenerator, StarfieldGenerator, StarfieldProfile, WorldSeed};
//!
//! let mut generator = StarfieldGenerator::new(WorldSeed::new(1000), 2048.0, StarfieldProfile::default())?;
//!
//! // Sectors around the player
//! let batch = generator.generate_around_focus(SectorCoord::new(0, 0), 2);
//! for failure in &batch.failures {
//!     eprintln!("sector {} failed: {}", failure.coord, failure.error);
//! }
//! world.register_all(batch.records)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod fragment;
pub mod sector;
pub mod seed;
pub mod starfield;

pub use error::GenerationError;
pub use fragment::{Fragment, FragmentConfig, FragmentPatternGenerator};
pub use sector::{SectorBatch, SectorFailure, SectorGenerator};
pub use seed::{derive_seed, seeded_rng, WorldSeed};
pub use starfield::{StarfieldGenerator, StarfieldProfile};
