//! Stations and their markets.

use std::collections::BTreeMap;

use driftfield_core::{InstanceId, PoolState, Poolable};
use driftfield_shared::{Commodity, EntityKind, EntityRecord, PriceQuote, RecordBody, RecordId, StationType, Vec2};

use super::{mismatch, Configurable, SpawnError};

/// Live station.
#[derive(Clone, Debug)]
pub struct StationBody {
    instance: InstanceId,
    state: PoolState,
    record: RecordId,
    /// Record seed.
    pub seed: i64,
    /// World position.
    pub position: Vec2,
    /// Role.
    pub station_type: StationType,
    /// Ships within this distance may dock.
    pub docking_radius: f64,
    prices: BTreeMap<Commodity, PriceQuote>,
}

impl StationBody {
    /// Price of a commodity, if traded here.
    #[must_use]
    pub fn quote(&self, commodity: Commodity) -> Option<PriceQuote> {
        self.prices.get(&commodity).copied()
    }

    /// Commodities traded here, in table order.
    pub fn commodities(&self) -> impl Iterator<Item = Commodity> + '_ {
        self.prices.keys().copied()
    }

    /// Checks if a ship at `point` is within docking range.
    #[must_use]
    pub fn can_dock(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.docking_radius
    }
}

impl Poolable for StationBody {
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
        self.docking_radius = 0.0;
        self.prices.clear();
    }
}

impl Configurable for StationBody {
    const KIND: EntityKind = EntityKind::Station;

    fn inert(instance: InstanceId) -> Self {
        Self {
            instance,
            state: PoolState::Pooled,
            record: RecordId::NULL,
            seed: 0,
            position: Vec2::ZERO,
            station_type: StationType::Trading,
            docking_radius: 0.0,
            prices: BTreeMap::new(),
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
        let RecordBody::Station(data) = &record.body else {
            return Err(mismatch::<Self>(record));
        };
        self.record = record.id;
        self.seed = record.seed;
        self.position = record.position;
        self.station_type = data.station_type;
        self.docking_radius = data.docking_radius;
        self.prices.clone_from(&data.prices);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_shared::{AsteroidData, SectorCoord, SizeClass, StationData};

    fn station() -> EntityRecord {
        let prices = [(Commodity::Fuel, PriceQuote { buy: 22.0, sell: 18.0 })].into_iter().collect();
        let mut record = EntityRecord::new(
            11,
            SectorCoord::new(0, 0),
            Vec2::new(500.0, 500.0),
            RecordBody::Station(StationData {
                station_type: StationType::Military,
                docking_radius: 40.0,
                prices,
            }),
        );
        record.id = RecordId::new(8);
        record
    }

    #[test]
    fn test_quotes_and_docking() {
        let mut body = StationBody::inert(InstanceId::new(0));
        body.configure(&station()).unwrap();

        assert_eq!(body.quote(Commodity::Fuel), Some(PriceQuote { buy: 22.0, sell: 18.0 }));
        assert_eq!(body.quote(Commodity::Ore), None);
        assert_eq!(body.commodities().collect::<Vec<_>>(), vec![Commodity::Fuel]);
        assert!(body.can_dock(Vec2::new(530.0, 500.0)));
        assert!(!body.can_dock(Vec2::new(560.0, 500.0)));
    }

    #[test]
    fn test_rejects_asteroid() {
        let mut body = StationBody::inert(InstanceId::new(0));
        let mut rock = EntityRecord::new(
            1,
            SectorCoord::new(0, 0),
            Vec2::ZERO,
            RecordBody::Asteroid(AsteroidData::new(SizeClass::Small)),
        );
        rock.id = RecordId::new(2);
        assert_eq!(
            body.configure(&rock),
            Err(SpawnError::TypeMismatch {
                expected: EntityKind::Station,
                found: EntityKind::Asteroid,
            })
        );
        assert!(body.record_id().is_null());
    }
}
