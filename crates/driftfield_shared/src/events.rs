//! World lifecycle events.
//!
//! Emitted by the universe and the spawners when content appears, disappears
//! or breaks apart. Presentation and audio subscribe to these instead of
//! polling the registry.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::record::{EntityKind, RecordId};
use crate::sector::SectorCoord;

/// Something observable happened to world content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A live instance was configured from a record.
    Spawned {
        /// Record the instance represents
        id: RecordId,
        /// Record kind
        kind: EntityKind,
        /// Position at spawn time
        position: Vec2,
    },

    /// A live instance went back to its pool.
    Despawned {
        /// Record the instance represented
        id: RecordId,
        /// Record kind
        kind: EntityKind,
    },

    /// An asteroid was destroyed and replaced by fragments.
    Fragmented {
        /// Destroyed asteroid (no longer registered)
        parent: RecordId,
        /// Newly registered fragment records
        children: Vec<RecordId>,
    },

    /// A sector's records were generated and registered.
    SectorGenerated {
        /// Sector coordinate
        coord: SectorCoord,
        /// Number of records registered
        records: usize,
    },

    /// Generation of a sector failed; neighbours were unaffected.
    SectorFailed {
        /// Sector coordinate
        coord: SectorCoord,
        /// Human readable failure reason
        reason: String,
    },
}

impl WorldEvent {
    /// Returns the record this event is about, if it concerns a single record.
    #[must_use]
    pub const fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Spawned { id, .. } | Self::Despawned { id, .. } => Some(*id),
            Self::Fragmented { parent, .. } => Some(*parent),
            Self::SectorGenerated { .. } | Self::SectorFailed { .. } => None,
        }
    }
}
