//! # World Configuration
//!
//! Every tunable of a universe, loadable from TOML. Every section has
//! defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! seed = 1000
//! sector_size = 2048.0
//! load_radius = 2
//!
//! [pool]
//! initial_size = 16
//! grow_step = 16
//! max_size = 256
//!
//! [starfield]
//! field_chance = 0.35
//! ```

use std::path::Path;

use driftfield_core::{PoolConfig, PoolConfigError};
use driftfield_procedural::{FragmentConfig, GenerationError, StarfieldProfile};
use driftfield_shared::constants::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_ITEMS_PER_TICK, DEFAULT_LOAD_RADIUS, DEFAULT_SECTOR_SIZE,
    DEFAULT_VISUAL_CACHE_CAPACITY, DEFAULT_WORLD_SEED,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Pool sizing is inconsistent.
    #[error("invalid pool config: {0}")]
    Pool(#[from] PoolConfigError),

    /// Generator parameters are inconsistent.
    #[error("invalid generator config: {0}")]
    Generation(#[from] GenerationError),
}

/// Deferred work settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Pending work items processed per tick.
    pub items_per_tick: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            items_per_tick: DEFAULT_ITEMS_PER_TICK,
        }
    }
}

/// Asteroid visual cache settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Distinct visuals kept; zero disables caching.
    pub cache_capacity: usize,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_VISUAL_CACHE_CAPACITY,
        }
    }
}

/// Event bus settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Events buffered per subscriber.
    pub capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Complete universe configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Root seed.
    pub seed: i64,
    /// Sector edge length in world units.
    pub sector_size: f64,
    /// Sectors loaded on each side of the focus.
    pub load_radius: i32,
    /// Pool sizing, shared by every spawner.
    pub pool: PoolConfig,
    /// Deferred work.
    pub scheduler: SchedulerConfig,
    /// Asteroid visuals.
    pub visuals: VisualConfig,
    /// Event bus.
    pub events: EventConfig,
    /// Sector content.
    pub starfield: StarfieldProfile,
    /// Asteroid breakup.
    pub fragments: FragmentConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_WORLD_SEED,
            sector_size: DEFAULT_SECTOR_SIZE,
            load_radius: DEFAULT_LOAD_RADIUS,
            pool: PoolConfig::default(),
            scheduler: SchedulerConfig::default(),
            visuals: VisualConfig::default(),
            events: EventConfig::default(),
            starfield: StarfieldProfile::default(),
            fragments: FragmentConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if reading, parsing or validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sector_size.is_finite() && self.sector_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "sector_size",
                reason: format!("must be a positive number, got {}", self.sector_size),
            });
        }
        if self.load_radius < 0 {
            return Err(ConfigError::Invalid {
                field: "load_radius",
                reason: format!("must not be negative, got {}", self.load_radius),
            });
        }
        if self.scheduler.items_per_tick == 0 {
            return Err(ConfigError::Invalid {
                field: "scheduler.items_per_tick",
                reason: "must be at least 1".into(),
            });
        }
        if self.events.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "events.capacity",
                reason: "must be at least 1".into(),
            });
        }
        self.pool.validate()?;
        self.starfield.validate()?;
        self.fragments.validate()?;
        Ok(())
    }
}
