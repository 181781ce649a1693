//! # World Dumps
//!
//! The registry serializes as one JSON object:
//!
//! ```text
//! { "version": 1, "next_id": 42, "records": { "1": { "kind": "Planet", ... }, ... } }
//! ```
//!
//! On disk the JSON is LZ4-compressed with a prepended size header. Loading
//! re-registers every record under its stored id, which rebuilds the indices
//! from scratch.

use std::collections::BTreeMap;
use std::path::Path;

use driftfield_shared::{EntityRecord, RecordId};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::registry::WorldData;

/// Current dump format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of a `WorldData`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Dump format version.
    pub version: u32,
    /// Id counter at the time of the dump.
    pub next_id: u64,
    /// Every record, keyed by id.
    pub records: BTreeMap<RecordId, EntityRecord>,
}

impl WorldData {
    /// Captures the registry contents.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            version: SNAPSHOT_VERSION,
            next_id: self.next_id().value(),
            records: self.iter().map(|r| (r.id, r.clone())).collect(),
        }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::Corrupt` for an unknown version, a record whose
    /// id is null or differs from its key.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> WorldResult<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(WorldError::Corrupt {
                reason: format!("unsupported dump version {}", snapshot.version),
            });
        }

        let mut world = Self::new();
        for (key, record) in snapshot.records {
            if record.id.is_null() || record.id != key {
                return Err(WorldError::Corrupt {
                    reason: format!("record under key {key} carries id {}", record.id),
                });
            }
            world.register(record)?;
        }
        world.reserve_ids_below(snapshot.next_id);

        Ok(world)
    }

    /// Serializes the registry to JSON.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::Json` if encoding fails.
    pub fn to_json(&self) -> WorldResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Rebuilds a registry from JSON.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::Json` for malformed input and
    /// `WorldError::Corrupt` for inconsistent content.
    pub fn from_json(json: &str) -> WorldResult<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Writes an LZ4-compressed JSON dump to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if encoding or file operations fail.
    pub fn save_compressed(&self, path: impl AsRef<Path>) -> WorldResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_vec(&self.snapshot())?;
        let compressed = compress_prepend_size(&json);
        std::fs::write(path, &compressed)?;

        tracing::info!(
            path = %path.display(),
            records = self.len(),
            bytes = compressed.len(),
            "world saved"
        );
        Ok(())
    }

    /// Reads an LZ4-compressed JSON dump from `path`.
    ///
    /// # Errors
    ///
    /// Returns error if file operations, decompression or decoding fail.
    pub fn load_compressed(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let compressed = std::fs::read(path)?;
        let json = decompress_size_prepended(&compressed)?;
        let world = Self::from_snapshot(serde_json::from_slice(&json)?)?;

        tracing::info!(path = %path.display(), records = world.len(), "world loaded");
        Ok(world)
    }
}
