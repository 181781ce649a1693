//! Asteroid and asteroid field payloads.

use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::math::Vec2;

/// Size class of an asteroid; drives mass, radius and fragmentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SizeClass {
    /// Smallest class, does not fragment
    Small = 0,
    /// Breaks into two small fragments
    Medium = 1,
    /// Breaks into one medium and one small fragment
    Large = 2,
}

impl SizeClass {
    /// Size classes of the fragments produced when this class is destroyed.
    #[must_use]
    pub const fn fragments(self) -> &'static [SizeClass] {
        match self {
            Self::Large => &[Self::Medium, Self::Small],
            Self::Medium => &[Self::Small, Self::Small],
            Self::Small => &[],
        }
    }

    /// Nominal mass.
    #[must_use]
    pub const fn base_mass(self) -> f64 {
        match self {
            Self::Small => 10.0,
            Self::Medium => 40.0,
            Self::Large => 120.0,
        }
    }

    /// Nominal radius in world units.
    #[must_use]
    pub const fn radius(self) -> f64 {
        match self {
            Self::Small => 8.0,
            Self::Medium => 16.0,
            Self::Large => 32.0,
        }
    }

    /// Render/physics scale relative to a medium asteroid.
    #[must_use]
    pub const fn scale(self) -> f64 {
        match self {
            Self::Small => 0.5,
            Self::Medium => 1.0,
            Self::Large => 2.0,
        }
    }
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        })
    }
}

/// Asteroid payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidData {
    /// Size class.
    pub size_class: SizeClass,
    /// Mass.
    pub mass: f64,
    /// Linear velocity in world units per second.
    pub velocity: Vec2,
    /// Angular velocity in radians per second.
    pub angular_velocity: f64,
    /// Collision outline relative to the asteroid center, if one was baked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_polygon: Option<Vec<Vec2>>,
    /// Field this asteroid belongs to (non-owning).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_field_id: Option<RecordId>,
    /// Seed of the owning field; resolved to `parent_field_id` on registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_seed: Option<i64>,
    /// Asteroid this one broke off from (lineage only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment_of: Option<RecordId>,
}

impl AsteroidData {
    /// Creates an asteroid at rest with the nominal mass of its class.
    #[must_use]
    pub const fn new(size_class: SizeClass) -> Self {
        Self {
            size_class,
            mass: size_class.base_mass(),
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            collision_polygon: None,
            parent_field_id: None,
            field_seed: None,
            fragment_of: None,
        }
    }
}

/// Asteroid field payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidFieldData {
    /// Radius of the field around its position.
    pub radius: f64,
    /// Asteroids generated for this field.
    pub asteroid_count: u32,
    /// Relative density in `[0, 1]`, used by presentation for dust.
    pub density: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragmentation_law() {
        assert_eq!(SizeClass::Large.fragments(), &[SizeClass::Medium, SizeClass::Small]);
        assert_eq!(SizeClass::Medium.fragments(), &[SizeClass::Small, SizeClass::Small]);
        assert!(SizeClass::Small.fragments().is_empty());
    }

    #[test]
    fn test_classes_are_ordered_by_mass() {
        assert!(SizeClass::Small.base_mass() < SizeClass::Medium.base_mass());
        assert!(SizeClass::Medium.base_mass() < SizeClass::Large.base_mass());
        assert!(SizeClass::Small.radius() < SizeClass::Large.radius());
    }
}
