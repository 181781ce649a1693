//! Umbrella error for universe operations.

use driftfield_core::PoolConfigError;
use driftfield_procedural::GenerationError;
use driftfield_world::WorldError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::spawner::SpawnError;

/// Result type for universe operations.
pub type DriftResult<T> = Result<T, DriftError>;

/// Errors that can occur in universe operations.
#[derive(Error, Debug)]
pub enum DriftError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Registry or dump error.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// Generation error.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Spawn error.
    #[error("spawn error: {0}")]
    Spawn(#[from] SpawnError),

    /// Pool sizing error.
    #[error("pool error: {0}")]
    Pool(#[from] PoolConfigError),
}
