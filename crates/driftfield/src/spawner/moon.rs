use driftfield_core::{InstanceId, PoolState, Poolable};
use driftfield_shared::{EntityKind, EntityRecord, RecordBody, RecordId, Vec2};

use super::{mismatch, Configurable, SpawnError};

/// Live free-standing moon.
///
/// Moons owned by a planet ride along as `Satellite`s instead; this body is
/// for moon records registered on their own.
#[derive(Clone, Debug)]
pub struct MoonBody {
    instance: InstanceId,
    state: PoolState,
    record: RecordId,
    /// Record seed.
    pub seed: i64,
    /// World position.
    pub position: Vec2,
    /// Moon radius, scale applied.
    pub radius: f64,
    /// Distance from the host.
    pub orbit_radius: f64,
    /// Radians per second.
    pub orbit_speed: f64,
    /// Angle at time zero.
    pub phase: f64,
    /// Host planet, if any.
    pub host: Option<RecordId>,
}

impl Poolable for MoonBody {
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

impl Configurable for MoonBody {
    const KIND: EntityKind = EntityKind::Moon;

    fn inert(instance: InstanceId) -> Self {
        Self {
            instance,
            state: PoolState::Pooled,
            record: RecordId::NULL,
            seed: 0,
            position: Vec2::ZERO,
            radius: 0.0,
            orbit_radius: 0.0,
            orbit_speed: 0.0,
            phase: 0.0,
            host: None,
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
        let RecordBody::Moon(data) = &record.body else {
            return Err(mismatch::<Self>(record));
        };
        self.record = record.id;
        self.seed = record.seed;
        self.position = record.position;
        self.radius = data.radius * record.scale;
        self.orbit_radius = data.orbit_radius;
        self.orbit_speed = data.orbit_speed;
        self.phase = data.phase;
        self.host = data.host_planet_id;
        Ok(())
    }
}
