//! # Sector Generation
//!
//! A sector generator implements one hook, `generate_sector`, and inherits
//! failure isolation and focus-area batching.
//!
//! ## Visit order
//!
//! ```text
//! for dy in -r..r {          // rows
//!     for dx in -r..r {      // columns
//!         focus + (dx, dy)
//!     }
//! }
//! ```

use driftfield_shared::{EntityRecord, SectorCoord};

use crate::error::GenerationError;

/// A sector that failed to generate. Its output was discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorFailure {
    /// Sector coordinate.
    pub coord: SectorCoord,
    /// Cause.
    pub error: GenerationError,
}

/// Output of a multi-sector generation pass.
#[derive(Clone, Debug, Default)]
pub struct SectorBatch {
    /// Records from every successful sector, in visit order.
    pub records: Vec<EntityRecord>,
    /// Sectors that generated successfully, in visit order.
    pub generated: Vec<SectorCoord>,
    /// Sectors that failed.
    pub failures: Vec<SectorFailure>,
}

impl SectorBatch {
    /// Checks if every visited sector succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Produces the records of a sector.
pub trait SectorGenerator {
    /// Generates every record of sector `(x, y)`.
    ///
    /// Records must be tagged with `sector == (x, y)`.
    ///
    /// # Errors
    ///
    /// Returns a `GenerationError` if the sector cannot be produced.
    fn generate_sector(&mut self, x: i32, y: i32) -> Result<Vec<EntityRecord>, GenerationError>;

    /// Generates one sector with failure isolation.
    ///
    /// A record tagged with another sector fails the whole sector.
    ///
    /// # Errors
    ///
    /// Returns the `SectorFailure` describing why the sector was discarded.
    fn generate_one(&mut self, coord: SectorCoord) -> Result<Vec<EntityRecord>, SectorFailure> {
        let records = self
            .generate_sector(coord.x, coord.y)
            .map_err(|error| SectorFailure { coord, error })?;

        if let Some(stray) = records.iter().find(|r| r.sector != coord) {
            return Err(SectorFailure {
                coord,
                error: GenerationError::MisTagged {
                    expected: coord,
                    found: stray.sector,
                },
            });
        }

        tracing::debug!(%coord, records = records.len(), "sector generated");
        Ok(records)
    }

    /// Generates the `2r x 2r` block of sectors starting `r` sectors before
    /// the focus on both axes.
    ///
    /// Failures are collected; the remaining sectors still generate. A
    /// non-positive radius yields an empty batch. Sectors past the edge of
    /// the `i32` grid are skipped.
    fn generate_around_focus(&mut self, focus: SectorCoord, radius: i32) -> SectorBatch {
        let mut batch = SectorBatch::default();
        if radius <= 0 {
            return batch;
        }

        for dy in -radius..radius {
            for dx in -radius..radius {
                let Some(coord) = focus.checked_offset(dx, dy) else {
                    continue;
                };
                match self.generate_one(coord) {
                    Ok(records) => {
                        batch.records.extend(records);
                        batch.generated.push(coord);
                    }
                    Err(failure) => {
                        tracing::warn!(%coord, error = %failure.error, "sector generation failed");
                        batch.failures.push(failure);
                    }
                }
            }
        }

        batch
    }
}
