//! Planet and moon payloads.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Broad planet category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetCategory {
    /// Rocky planet with a surface
    Terran,
    /// Gas giant
    Gaseous,
}

/// Visual theme handed to presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetTheme {
    /// Dry, dusty surface
    Arid,
    /// Mostly water
    Oceanic,
    /// Vegetated
    Verdant,
    /// Ice-covered
    Frozen,
    /// Lava and ash
    Volcanic,
    /// Striped gas bands
    Banded,
    /// Large storm systems
    Stormy,
    /// Washed-out, hazy gas
    Pale,
}

impl PlanetTheme {
    /// Themes available to a category.
    #[must_use]
    pub const fn for_category(category: PlanetCategory) -> &'static [PlanetTheme] {
        match category {
            PlanetCategory::Terran => &[
                Self::Arid,
                Self::Oceanic,
                Self::Verdant,
                Self::Frozen,
                Self::Volcanic,
            ],
            PlanetCategory::Gaseous => &[Self::Banded, Self::Stormy, Self::Pale],
        }
    }
}

/// Planet payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetData {
    /// Category.
    pub category: PlanetCategory,
    /// Visual theme, always one of `PlanetTheme::for_category(category)`.
    pub theme: PlanetTheme,
    /// Planet radius in world units.
    pub radius: f64,
    /// Moons owned by this planet.
    #[serde(default)]
    pub moons: Vec<MoonData>,
}

/// Moon payload.
///
/// Moons normally live inside their planet's `moons` list. A moon registered
/// on its own (kind `Moon`) points back at its host instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonData {
    /// Seed for the moon's own visuals.
    pub seed: i64,
    /// Orbit radius around the host center.
    pub orbit_radius: f64,
    /// Angular speed in radians per second.
    pub orbit_speed: f64,
    /// Orbit phase at time zero, in radians.
    pub phase: f64,
    /// Moon radius.
    pub radius: f64,
    /// Host planet (non-owning), for standalone moon records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_planet_id: Option<RecordId>,
}
