//! # Starfield Generator
//!
//! The default sector hook. Each sector rolls, from its own seeded stream:
//!
//! - an asteroid field with member asteroids (field record first)
//! - a planet with up to `max_moons` moons
//! - a station with a seeded price table
//! - a few loose asteroids
//!
//! Every record seed is derived from `(root, x, y, context)` so a record can
//! be regenerated on its own without replaying the sector stream.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use driftfield_shared::{
    AsteroidData, AsteroidFieldData, EntityRecord, MoonData, PlanetCategory, PlanetData, PlanetTheme, PriceQuote,
    RecordBody, SectorCoord, SizeClass, StationData, StationType, Vec2,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::sector::SectorGenerator;
use crate::seed::{derive_seed, seeded_rng, WorldSeed};

/// Tunables for sector content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldProfile {
    /// Chance that a sector holds an asteroid field.
    pub field_chance: f64,
    /// Member asteroids per field, inclusive.
    pub field_asteroids: [u32; 2],
    /// Field radius range.
    pub field_radius: [f64; 2],
    /// Chance that a sector holds a planet.
    pub planet_chance: f64,
    /// Planet radius range.
    pub planet_radius: [f64; 2],
    /// Upper bound on moons per planet.
    pub max_moons: u32,
    /// Chance that a sector holds a station.
    pub station_chance: f64,
    /// Loose asteroids per sector, inclusive.
    pub loose_asteroids: [u32; 2],
    /// Fraction of the sector edge kept free when placing content.
    pub edge_margin: f64,
}

impl Default for StarfieldProfile {
    fn default() -> Self {
        Self {
            field_chance: 0.35,
            field_asteroids: [4, 10],
            field_radius: [250.0, 600.0],
            planet_chance: 0.25,
            planet_radius: [80.0, 220.0],
            max_moons: 3,
            station_chance: 0.15,
            loose_asteroids: [0, 3],
            edge_margin: 0.1,
        }
    }
}

impl StarfieldProfile {
    /// Checks every chance and range.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for (name, chance) in [
            ("field_chance", self.field_chance),
            ("planet_chance", self.planet_chance),
            ("station_chance", self.station_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!("{name} must be within [0, 1], got {chance}")));
            }
        }

        for (name, [min, max]) in [
            ("field_radius", self.field_radius),
            ("planet_radius", self.planet_radius),
        ] {
            if !(min.is_finite() && max.is_finite() && 0.0 < min && min <= max) {
                return Err(invalid(format!("{name} must satisfy 0 < min <= max, got [{min}, {max}]")));
            }
        }

        for (name, [min, max]) in [
            ("field_asteroids", self.field_asteroids),
            ("loose_asteroids", self.loose_asteroids),
        ] {
            if min > max {
                return Err(invalid(format!("{name} min {min} exceeds max {max}")));
            }
        }

        if !(0.0..0.5).contains(&self.edge_margin) {
            return Err(invalid(format!("edge_margin must be within [0, 0.5), got {}", self.edge_margin)));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> GenerationError {
    GenerationError::InvalidConfig(reason)
}

/// Sector hook producing fields, asteroids, planets and stations.
#[derive(Clone, Debug)]
pub struct StarfieldGenerator {
    seed: WorldSeed,
    sector_size: f64,
    profile: StarfieldProfile,
}

impl StarfieldGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidConfig` for a non-positive sector
    /// size or an invalid profile.
    pub fn new(seed: WorldSeed, sector_size: f64, profile: StarfieldProfile) -> Result<Self, GenerationError> {
        if !(sector_size.is_finite() && sector_size > 0.0) {
            return Err(invalid(format!("sector size must be positive, got {sector_size}")));
        }
        profile.validate()?;
        Ok(Self {
            seed,
            sector_size,
            profile,
        })
    }

    /// Root seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Sector size in world units.
    #[must_use]
    pub const fn sector_size(&self) -> f64 {
        self.sector_size
    }

    fn entity_seed(&self, coord: SectorCoord, context: &str) -> i64 {
        derive_seed(self.seed.value(), coord.x, coord.y, context)
    }

    /// Random point inside the sector, away from its edges.
    fn place(&self, rng: &mut ChaCha8Rng, coord: SectorCoord) -> Vec2 {
        let margin = self.sector_size * self.profile.edge_margin;
        let span = margin..=(self.sector_size - margin);
        let position = coord.origin(self.sector_size) + Vec2::new(rng.gen_range(span.clone()), rng.gen_range(span));
        self.confine(position, coord)
    }

    /// Pulls a point back inside the sector bounds.
    fn confine(&self, position: Vec2, coord: SectorCoord) -> Vec2 {
        let origin = coord.origin(self.sector_size);
        let far = self.sector_size * (1.0 - 1e-9);
        Vec2::new(
            position.x.clamp(origin.x, origin.x + far),
            position.y.clamp(origin.y, origin.y + far),
        )
    }

    fn asteroid(&self, rng: &mut ChaCha8Rng, coord: SectorCoord, seed: i64, position: Vec2) -> EntityRecord {
        let size_class = match rng.gen_range(0..10) {
            0..=1 => SizeClass::Large,
            2..=4 => SizeClass::Medium,
            _ => SizeClass::Small,
        };

        let mut data = AsteroidData::new(size_class);
        data.mass = size_class.base_mass() * rng.gen_range(0.8..=1.2);
        data.velocity = Vec2::from_angle(rng.gen_range(0.0..TAU)) * rng.gen_range(0.0..=12.0);
        data.angular_velocity = rng.gen_range(-0.6..=0.6);

        EntityRecord::new(seed, coord, self.confine(position, coord), RecordBody::Asteroid(data))
            .with_scale(size_class.scale())
    }

    fn field(&self, rng: &mut ChaCha8Rng, coord: SectorCoord, out: &mut Vec<EntityRecord>) {
        let field_seed = self.entity_seed(coord, "field");
        let center = self.place(rng, coord);
        let [rmin, rmax] = self.profile.field_radius;
        let radius = rng.gen_range(rmin..=rmax);
        let [cmin, cmax] = self.profile.field_asteroids;
        let count = rng.gen_range(cmin..=cmax);

        out.push(EntityRecord::new(
            field_seed,
            coord,
            center,
            RecordBody::AsteroidField(AsteroidFieldData {
                radius,
                asteroid_count: count,
                density: rng.gen_range(0.2..=0.9),
            }),
        ));

        for i in 0..count {
            let seed = self.entity_seed(coord, &format!("asteroid_{i}"));
            let offset = Vec2::from_angle(rng.gen_range(0.0..TAU)) * rng.gen_range(0.0..=radius);
            let mut record = self.asteroid(rng, coord, seed, center + offset);
            if let Some(data) = record.as_asteroid_mut() {
                data.field_seed = Some(field_seed);
            }
            out.push(record);
        }
    }

    fn planet(&self, rng: &mut ChaCha8Rng, coord: SectorCoord) -> EntityRecord {
        let category = if rng.gen_bool(0.6) {
            PlanetCategory::Terran
        } else {
            PlanetCategory::Gaseous
        };
        let themes = PlanetTheme::for_category(category);
        let theme = themes[rng.gen_range(0..themes.len())];
        let [rmin, rmax] = self.profile.planet_radius;
        let radius = match category {
            PlanetCategory::Terran => rng.gen_range(rmin..=rmax),
            PlanetCategory::Gaseous => rng.gen_range(rmin..=rmax) * 1.5,
        };

        let moons = (0..rng.gen_range(0..=self.profile.max_moons))
            .map(|i| MoonData {
                seed: self.entity_seed(coord, &format!("moon_{i}")),
                orbit_radius: radius * (2.0 + f64::from(i)) + rng.gen_range(0.0..=radius * 0.5),
                orbit_speed: rng.gen_range(0.05..=0.4) / (1.0 + f64::from(i)),
                phase: rng.gen_range(0.0..TAU),
                radius: radius * rng.gen_range(0.08..=0.25),
                host_planet_id: None,
            })
            .collect();

        EntityRecord::new(
            self.entity_seed(coord, "planet"),
            coord,
            self.place(rng, coord),
            RecordBody::Planet(PlanetData {
                category,
                theme,
                radius,
                moons,
            }),
        )
    }

    fn station(&self, rng: &mut ChaCha8Rng, coord: SectorCoord) -> EntityRecord {
        let seed = self.entity_seed(coord, "station");
        let station_type = StationType::ALL[rng.gen_range(0..StationType::ALL.len())];

        // Prices come from the station's own stream so they can be rerolled
        // without touching the sector stream.
        let mut market = seeded_rng(seed);
        let prices: BTreeMap<_, _> = station_type
            .stocked()
            .iter()
            .map(|&commodity| {
                let buy = commodity.base_price() * market.gen_range(1.05..=1.4);
                let sell = buy * market.gen_range(0.7..=0.9);
                (commodity, PriceQuote { buy, sell })
            })
            .collect();

        EntityRecord::new(
            seed,
            coord,
            self.place(rng, coord),
            RecordBody::Station(StationData {
                station_type,
                docking_radius: rng.gen_range(40.0..=90.0),
                prices,
            }),
        )
    }
}

impl SectorGenerator for StarfieldGenerator {
    fn generate_sector(&mut self, x: i32, y: i32) -> Result<Vec<EntityRecord>, GenerationError> {
        let coord = SectorCoord::new(x, y);
        let mut rng = self.seed.sector_rng(coord);
        let mut records = Vec::new();

        if rng.gen_bool(self.profile.field_chance) {
            self.field(&mut rng, coord, &mut records);
        }
        if rng.gen_bool(self.profile.planet_chance) {
            records.push(self.planet(&mut rng, coord));
        }
        if rng.gen_bool(self.profile.station_chance) {
            records.push(self.station(&mut rng, coord));
        }

        let [lmin, lmax] = self.profile.loose_asteroids;
        for i in 0..rng.gen_range(lmin..=lmax) {
            let seed = self.entity_seed(coord, &format!("loose_{i}"));
            let position = self.place(&mut rng, coord);
            records.push(self.asteroid(&mut rng, coord, seed, position));
        }

        Ok(records)
    }
}
