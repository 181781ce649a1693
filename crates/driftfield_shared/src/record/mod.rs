//! # Entity Records
//!
//! Serializable descriptions of generated content.
//!
//! A record says *what* exists at a place in the world; it never points at a
//! live instance. Records are created once by a generator (or by
//! fragmentation), owned by the registry, and outlive any number of
//! spawn/despawn cycles.
//!
//! ## Wire shape
//!
//! A record serializes as a flat object with a `kind` tag:
//!
//! ```text
//! { "id": 7, "seed": -12, "sector": {"x":0,"y":1}, "position": {"x":..,"y":..},
//!   "scale": 1.0, "created_at": 3, "kind": "Asteroid", "size_class": "Large", ... }
//! ```

mod asteroid;
mod planet;
mod station;

pub use asteroid::{AsteroidData, AsteroidFieldData, SizeClass};
pub use planet::{MoonData, PlanetCategory, PlanetData, PlanetTheme};
pub use station::{Commodity, PriceQuote, StationData, StationType};

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::sector::SectorCoord;

/// Registry-issued identity of a record.
///
/// `0` is reserved for "not yet registered".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Unassigned record ID.
    pub const NULL: Self = Self(0);

    /// Creates a record ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Checks if this ID is unassigned.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Planet, owns its moons
    Planet = 0,
    /// Moon
    Moon = 1,
    /// Single asteroid
    Asteroid = 2,
    /// Region holding a group of asteroids
    AsteroidField = 3,
    /// Station with a market
    Station = 4,
}

impl EntityKind {
    /// Every kind, in discriminant order.
    pub const ALL: [Self; 5] = [
        Self::Planet,
        Self::Moon,
        Self::Asteroid,
        Self::AsteroidField,
        Self::Station,
    ];

    /// Returns the kind name used in logs and dumps.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planet => "Planet",
            Self::Moon => "Moon",
            Self::Asteroid => "Asteroid",
            Self::AsteroidField => "AsteroidField",
            Self::Station => "Station",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a record.
///
/// The variant *is* the kind, so a record cannot disagree with itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RecordBody {
    /// Asteroid payload.
    Asteroid(AsteroidData),
    /// Asteroid field payload.
    AsteroidField(AsteroidFieldData),
    /// Planet payload (owns its moons).
    Planet(PlanetData),
    /// Standalone moon payload.
    Moon(MoonData),
    /// Station payload.
    Station(StationData),
}

impl RecordBody {
    /// Returns the kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Asteroid(_) => EntityKind::Asteroid,
            Self::AsteroidField(_) => EntityKind::AsteroidField,
            Self::Planet(_) => EntityKind::Planet,
            Self::Moon(_) => EntityKind::Moon,
            Self::Station(_) => EntityKind::Station,
        }
    }
}

/// Serializable description of one piece of generated content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Registry-issued identity; `RecordId::NULL` until registered.
    pub id: RecordId,
    /// Seed for every further derivation (visuals, fragments, moons).
    pub seed: i64,
    /// Sector this record belongs to.
    pub sector: SectorCoord,
    /// World position.
    pub position: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
    /// Tick at which the record was registered (debug only).
    #[serde(default)]
    pub created_at: u64,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub body: RecordBody,
}

impl EntityRecord {
    /// Creates an unregistered record with unit scale.
    #[must_use]
    pub fn new(seed: i64, sector: SectorCoord, position: Vec2, body: RecordBody) -> Self {
        Self {
            id: RecordId::NULL,
            seed,
            sector,
            position,
            scale: 1.0,
            created_at: 0,
            body,
        }
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the kind of this record.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.body.kind()
    }

    /// Returns the asteroid payload, if this is an asteroid.
    #[must_use]
    pub const fn as_asteroid(&self) -> Option<&AsteroidData> {
        match &self.body {
            RecordBody::Asteroid(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the mutable asteroid payload, if this is an asteroid.
    pub fn as_asteroid_mut(&mut self) -> Option<&mut AsteroidData> {
        match &mut self.body {
            RecordBody::Asteroid(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the field payload, if this is an asteroid field.
    #[must_use]
    pub const fn as_field(&self) -> Option<&AsteroidFieldData> {
        match &self.body {
            RecordBody::AsteroidField(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the planet payload, if this is a planet.
    #[must_use]
    pub const fn as_planet(&self) -> Option<&PlanetData> {
        match &self.body {
            RecordBody::Planet(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the moon payload, if this is a standalone moon.
    #[must_use]
    pub const fn as_moon(&self) -> Option<&MoonData> {
        match &self.body {
            RecordBody::Moon(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the station payload, if this is a station.
    #[must_use]
    pub const fn as_station(&self) -> Option<&StationData> {
        match &self.body {
            RecordBody::Station(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_asteroid() -> EntityRecord {
        let mut data = AsteroidData::new(SizeClass::Large);
        data.velocity = Vec2::new(3.5, -1.25);
        data.parent_field_id = Some(RecordId::new(4));
        EntityRecord::new(-42, SectorCoord::new(3, -2), Vec2::new(10.0, 20.0), RecordBody::Asteroid(data))
            .with_scale(2.0)
    }

    #[test]
    fn test_kind_follows_body() {
        let record = sample_asteroid();
        assert_eq!(record.kind(), EntityKind::Asteroid);
        assert!(record.as_asteroid().is_some());
        assert!(record.as_planet().is_none());
        assert!(record.id.is_null());
    }

    #[test]
    fn test_record_json_is_kind_tagged_and_flat() {
        let json = serde_json::to_value(sample_asteroid()).unwrap();

        assert_eq!(json["kind"], "Asteroid");
        assert_eq!(json["size_class"], "Large");
        assert_eq!(json["position"]["x"], 10.0);
        assert_eq!(json["velocity"]["y"], -1.25);
        assert_eq!(json["parent_field_id"], 4);
        assert!(json.get("collision_polygon").is_none());
    }

    #[test]
    fn test_record_json_round_trip_all_kinds() {
        let mut prices = BTreeMap::new();
        prices.insert(Commodity::Ore, PriceQuote { buy: 10.5, sell: 9.0 });

        let records = vec![
            sample_asteroid(),
            EntityRecord::new(
                1,
                SectorCoord::new(0, 0),
                Vec2::ZERO,
                RecordBody::AsteroidField(AsteroidFieldData {
                    radius: 300.0,
                    asteroid_count: 6,
                    density: 0.4,
                }),
            ),
            EntityRecord::new(
                2,
                SectorCoord::new(-1, 5),
                Vec2::new(-5.0, 5.0),
                RecordBody::Planet(PlanetData {
                    category: PlanetCategory::Gaseous,
                    theme: PlanetTheme::Banded,
                    radius: 180.0,
                    moons: vec![MoonData {
                        seed: 77,
                        orbit_radius: 400.0,
                        orbit_speed: 0.1,
                        phase: 1.0,
                        radius: 20.0,
                        host_planet_id: None,
                    }],
                }),
            ),
            EntityRecord::new(
                3,
                SectorCoord::new(9, 9),
                Vec2::new(1.0, 1.0),
                RecordBody::Station(StationData {
                    station_type: StationType::Mining,
                    docking_radius: 60.0,
                    prices,
                }),
            ),
        ];

        for record in records {
            let json = serde_json::to_string(&record).unwrap();
            let restored: EntityRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, record, "round trip changed {json}");
        }
    }

    #[test]
    fn test_kind_names() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
