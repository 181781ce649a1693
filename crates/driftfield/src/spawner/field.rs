use driftfield_core::{InstanceId, PoolState, Poolable};
use driftfield_shared::{EntityKind, EntityRecord, RecordBody, RecordId, Vec2};

use super::{mismatch, Configurable, SpawnError};

/// Live asteroid field marker.
#[derive(Clone, Debug)]
pub struct FieldBody {
    instance: InstanceId,
    state: PoolState,
    record: RecordId,
    /// Record seed.
    pub seed: i64,
    /// Field center.
    pub center: Vec2,
    /// Field radius, scale applied.
    pub radius: f64,
    /// Members generated with the field.
    pub asteroid_count: u32,
    /// Member density.
    pub density: f64,
}

impl FieldBody {
    /// Checks if a point lies inside the field.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }
}

impl Poolable for FieldBody {
    fn pool_state(&self) -> PoolState {
        self.state
    }

    fn set_pool_state(&mut self, state: PoolState) {
        self.state = state;
    }

    fn reset(&mut self) {
        *self = Self {
            state: self.state,
            ..Self::inert(self.instance)
        };
    }
}

impl Configurable for FieldBody {
    const KIND: EntityKind = EntityKind::AsteroidField;

    fn inert(instance: InstanceId) -> Self {
        Self {
            instance,
            state: PoolState::Pooled,
            record: RecordId::NULL,
            seed: 0,
            center: Vec2::ZERO,
            radius: 0.0,
            asteroid_count: 0,
            density: 0.0,
        }
    }

    fn instance_id(&self) -> InstanceId {
        self.instance
    }

    fn record_id(&self) -> RecordId {
        self.record
    }

    fn position(&self) -> Vec2 {
        self.center
    }

    fn configure(&mut self, record: &EntityRecord) -> Result<(), SpawnError> {
        let RecordBody::AsteroidField(data) = &record.body else {
            return Err(mismatch::<Self>(record));
        };
        self.record = record.id;
        self.seed = record.seed;
        self.center = record.position;
        self.radius = data.radius * record.scale;
        self.asteroid_count = data.asteroid_count;
        self.density = data.density;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_shared::{AsteroidFieldData, SectorCoord};

    #[test]
    fn test_contains_uses_scaled_radius() {
        let mut record = EntityRecord::new(
            1,
            SectorCoord::new(0, 0),
            Vec2::new(0.0, 0.0),
            RecordBody::AsteroidField(AsteroidFieldData {
                radius: 100.0,
                asteroid_count: 4,
                density: 0.2,
            }),
        )
        .with_scale(2.0);
        record.id = RecordId::new(3);

        let mut body = FieldBody::inert(InstanceId::new(0));
        body.configure(&record).unwrap();
        assert!(body.contains(Vec2::new(150.0, 0.0)));
        assert!(!body.contains(Vec2::new(250.0, 0.0)));
    }
}
