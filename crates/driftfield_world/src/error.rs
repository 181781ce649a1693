//! # World Error Types
//!
//! All errors that can occur in the registry and in world dumps.

use driftfield_shared::RecordId;
use thiserror::Error;

/// Errors that can occur in the world registry.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A record with this id is already registered.
    #[error("duplicate record id {0}")]
    DuplicateId(RecordId),

    /// No id is left above the highest one ever issued.
    #[error("record id space exhausted")]
    IdSpaceExhausted,

    /// A world dump could not be encoded or decoded.
    #[error("world dump json: {0}")]
    Json(#[from] serde_json::Error),

    /// A world dump could not be read or written.
    #[error("world dump io: {0}")]
    Io(#[from] std::io::Error),

    /// A compressed world dump could not be decompressed.
    #[error("world dump decompression: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    /// A world dump decoded but its content is inconsistent.
    #[error("corrupt world dump: {reason}")]
    Corrupt {
        /// What was inconsistent.
        reason: String,
    },

    /// Canonical map and indices disagree.
    #[error("index inconsistency: {reason}")]
    IndexInconsistent {
        /// Which direction of the check failed.
        reason: String,
    },
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
