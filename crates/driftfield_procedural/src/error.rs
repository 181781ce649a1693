//! # Generation Error Types

use driftfield_shared::{EntityKind, SectorCoord};
use thiserror::Error;

/// Errors that can occur during procedural generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Generator parameters are out of range.
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    /// A sector hook could not produce its content.
    #[error("sector {coord} hook failed: {reason}")]
    Hook {
        /// Sector being generated.
        coord: SectorCoord,
        /// Failure reason reported by the hook.
        reason: String,
    },

    /// A hook returned a record tagged with another sector.
    #[error("record tagged with sector {found} while generating {expected}")]
    MisTagged {
        /// Sector being generated.
        expected: SectorCoord,
        /// Sector the record claimed.
        found: SectorCoord,
    },

    /// The source record has the wrong kind for this generator.
    #[error("expected a {expected} record, found {found}")]
    TypeMismatch {
        /// Kind the generator accepts.
        expected: EntityKind,
        /// Kind it was given.
        found: EntityKind,
    },
}
