//! Planets and their orbiting satellites.

use driftfield_core::{InstanceId, PoolState, Poolable};
use driftfield_shared::{EntityKind, EntityRecord, MoonData, PlanetCategory, PlanetTheme, RecordBody, RecordId, Vec2};

use super::{mismatch, Configurable, SpawnError};

/// A moon carried by its planet instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Satellite {
    /// Moon seed.
    pub seed: i64,
    /// Distance from the planet center.
    pub orbit_radius: f64,
    /// Radians per second.
    pub orbit_speed: f64,
    /// Angle at time zero.
    pub phase: f64,
    /// Moon radius.
    pub radius: f64,
}

impl Satellite {
    /// Offset from the planet center after `elapsed` seconds.
    #[must_use]
    pub fn offset_at(&self, elapsed: f64) -> Vec2 {
        Vec2::from_angle(self.phase + self.orbit_speed * elapsed) * self.orbit_radius
    }

    /// World position for a planet at `center`.
    #[must_use]
    pub fn position_at(&self, center: Vec2, elapsed: f64) -> Vec2 {
        center + self.offset_at(elapsed)
    }
}

impl From<&MoonData> for Satellite {
    fn from(moon: &MoonData) -> Self {
        Self {
            seed: moon.seed,
            orbit_radius: moon.orbit_radius,
            orbit_speed: moon.orbit_speed,
            phase: moon.phase,
            radius: moon.radius,
        }
    }
}

/// Live planet.
#[derive(Clone, Debug)]
pub struct PlanetBody {
    instance: InstanceId,
    state: PoolState,
    record: RecordId,
    /// Record seed.
    pub seed: i64,
    /// World position.
    pub position: Vec2,
    /// Planet radius, scale applied.
    pub radius: f64,
    /// Category.
    pub category: PlanetCategory,
    /// Surface theme.
    pub theme: PlanetTheme,
    /// Owned moons, in record order.
    pub satellites: Vec<Satellite>,
}

impl Poolable for PlanetBody {
    fn pool_state(&self) -> PoolState {
        self.state
    }

    fn set_pool_state(&mut self, state: PoolState) {
        self.state = state;
    }

    fn reset(&mut self) {
        self.record = RecordId::NULL;
        self.seed = 0;
        self.position = Vec2::ZERO;
        self.radius = 0.0;
        // Keep the allocation for the next planet.
        self.satellites.clear();
    }
}

impl Configurable for PlanetBody {
    const KIND: EntityKind = EntityKind::Planet;

    fn inert(instance: InstanceId) -> Self {
        Self {
            instance,
            state: PoolState::Pooled,
            record: RecordId::NULL,
            seed: 0,
            position: Vec2::ZERO,
            radius: 0.0,
            category: PlanetCategory::Terran,
            theme: PlanetTheme::Verdant,
            satellites: Vec::new(),
        }
    }

    fn instance_id(&self) -> InstanceId {
        self.instance
    }

    fn record_id(&self) -> RecordId {
        self.record
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn configure(&mut self, record: &EntityRecord) -> Result<(), SpawnError> {
        let RecordBody::Planet(data) = &record.body else {
            return Err(mismatch::<Self>(record));
        };

        self.record = record.id;
        self.seed = record.seed;
        self.position = record.position;
        self.radius = data.radius * record.scale;
        self.category = data.category;
        self.theme = data.theme;
        self.satellites.clear();
        self.satellites.extend(data.moons.iter().map(Satellite::from));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_shared::{PlanetData, SectorCoord};

    fn planet(moons: usize) -> EntityRecord {
        let moons = (0..moons)
            .map(|i| MoonData {
                seed: i as i64,
                orbit_radius: 200.0 + 50.0 * i as f64,
                orbit_speed: 0.1,
                phase: 0.0,
                radius: 12.0,
                host_planet_id: None,
            })
            .collect();
        let mut record = EntityRecord::new(
            3,
            SectorCoord::new(1, 1),
            Vec2::new(3000.0, 3000.0),
            RecordBody::Planet(PlanetData {
                category: PlanetCategory::Gaseous,
                theme: PlanetTheme::Banded,
                radius: 150.0,
                moons,
            }),
        );
        record.id = RecordId::new(4);
        record
    }

    #[test]
    fn test_configure_copies_satellites() {
        let mut body = PlanetBody::inert(InstanceId::new(1));
        body.configure(&planet(2)).unwrap();
        assert_eq!(body.satellites.len(), 2);
        assert_eq!(body.satellites[1].orbit_radius, 250.0);

        body.configure(&planet(0)).unwrap();
        assert!(body.satellites.is_empty());
    }

    #[test]
    fn test_satellite_orbit() {
        let moon = Satellite {
            seed: 0,
            orbit_radius: 100.0,
            orbit_speed: std::f64::consts::FRAC_PI_2,
            phase: 0.0,
            radius: 5.0,
        };
        let after = moon.position_at(Vec2::new(10.0, 10.0), 1.0);
        assert!((after.x - 10.0).abs() < 1e-9);
        assert!((after.y - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_clears_satellites() {
        let mut body = PlanetBody::inert(InstanceId::new(1));
        body.configure(&planet(3)).unwrap();
        body.reset();
        assert!(body.satellites.is_empty());
        assert!(body.record_id().is_null());
    }
}
