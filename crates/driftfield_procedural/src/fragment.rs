//! # Fragment Patterns
//!
//! Breaks a destroyed asteroid into smaller ones:
//!
//! ```text
//! Large  -> [Medium, Small]
//! Medium -> [Small, Small]
//! Small  -> []
//! ```
//!
//! Fragments spread evenly around the parent with seeded jitter. Per
//! fragment, draws happen in a fixed order: jitter, radial offset,
//! explosion speed, spin. Reordering them changes every saved universe.

use std::f64::consts::TAU;

use driftfield_shared::{AsteroidData, EntityKind, EntityRecord, RecordBody, RecordId, SizeClass, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::seed::{derive_seed, seeded_rng};

/// Spread parameters for fragment patterns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Maximum angular jitter around the even spread, in radians.
    pub max_jitter: f64,
    /// Distance from the parent center, inclusive range.
    pub radial_offset: [f64; 2],
    /// Speed added along the spread direction, inclusive range.
    pub explosion_speed: [f64; 2],
    /// Maximum spin added to the parent's angular velocity.
    pub max_spin: f64,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            max_jitter: 0.35,
            radial_offset: [10.0, 25.0],
            explosion_speed: [40.0, 90.0],
            max_spin: 1.5,
        }
    }
}

impl FragmentConfig {
    /// Checks every range.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for (name, value) in [("max_jitter", self.max_jitter), ("max_spin", self.max_spin)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GenerationError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }
        for (name, [min, max]) in [
            ("radial_offset", self.radial_offset),
            ("explosion_speed", self.explosion_speed),
        ] {
            if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} must satisfy 0 <= min <= max, got [{min}, {max}]"
                )));
            }
        }
        Ok(())
    }
}

/// One fragment of a pattern, relative to its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Position in the pattern.
    pub index: usize,
    /// Seed of the fragment record.
    pub seed: i64,
    /// Size class of the fragment.
    pub size_class: SizeClass,
    /// Offset from the parent position.
    pub offset: Vec2,
    /// Velocity added to the parent velocity.
    pub velocity_delta: Vec2,
    /// Spin added to the parent angular velocity.
    pub spin_delta: f64,
}

impl Fragment {
    /// Parent-derived id (`parent * 10 + index + 1`), kept for diagnostics.
    ///
    /// Registry ids are authoritative; this value is not guaranteed unique.
    #[must_use]
    pub fn legacy_id(&self, parent: RecordId) -> u64 {
        parent
            .value()
            .wrapping_mul(10)
            .wrapping_add(self.index as u64 + 1)
    }
}

/// Deterministic asteroid fragmentation.
#[derive(Clone, Debug, Default)]
pub struct FragmentPatternGenerator {
    config: FragmentConfig,
}

impl FragmentPatternGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidConfig` for an invalid config.
    pub fn new(config: FragmentConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Spread parameters.
    #[must_use]
    pub const fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Fragment pattern for a parent seed and size class.
    #[must_use]
    pub fn pattern(&self, seed: i64, size_class: SizeClass) -> Vec<Fragment> {
        let classes = size_class.fragments();
        let count = classes.len() as f64;
        let mut rng = seeded_rng(seed);

        let FragmentConfig {
            max_jitter,
            radial_offset: [rmin, rmax],
            explosion_speed: [smin, smax],
            max_spin,
        } = self.config;

        classes
            .iter()
            .enumerate()
            .map(|(index, &class)| {
                let jitter = rng.gen_range(-max_jitter..=max_jitter);
                let radial = rng.gen_range(rmin..=rmax);
                let speed = rng.gen_range(smin..=smax);
                let spin = rng.gen_range(-max_spin..=max_spin);

                let direction = Vec2::from_angle(TAU * index as f64 / count + jitter);
                Fragment {
                    index,
                    seed: derive_seed(seed, index as i32, 0, "fragment"),
                    size_class: class,
                    offset: direction * radial,
                    velocity_delta: direction * speed,
                    spin_delta: spin,
                }
            })
            .collect()
    }

    /// Fragment records for a destroyed asteroid.
    ///
    /// Fragments keep the parent's sector and field, record the parent in
    /// `fragment_of` and are unregistered (`RecordId::NULL`).
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::TypeMismatch` if `source` is not an asteroid.
    pub fn generate(&self, source: &EntityRecord) -> Result<Vec<EntityRecord>, GenerationError> {
        let parent = source.as_asteroid().ok_or(GenerationError::TypeMismatch {
            expected: EntityKind::Asteroid,
            found: source.kind(),
        })?;

        let fragments = self.pattern(source.seed, parent.size_class);
        tracing::debug!(
            parent = %source.id,
            size_class = %parent.size_class,
            fragments = fragments.len(),
            "asteroid fragmented"
        );

        Ok(fragments
            .into_iter()
            .map(|fragment| {
                let mut data = AsteroidData::new(fragment.size_class);
                data.velocity = parent.velocity + fragment.velocity_delta;
                data.angular_velocity = parent.angular_velocity + fragment.spin_delta;
                data.parent_field_id = parent.parent_field_id;
                data.field_seed = parent.field_seed;
                data.fragment_of = (!source.id.is_null()).then_some(source.id);

                EntityRecord::new(
                    fragment.seed,
                    source.sector,
                    source.position + fragment.offset,
                    RecordBody::Asteroid(data),
                )
                .with_scale(fragment.size_class.scale())
            })
            .collect())
    }
}
