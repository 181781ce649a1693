//! # Sector Coordinates
//!
//! The world is split into fixed-size square sectors, the unit of
//! procedural generation. Sector size is configuration, so every conversion
//! between world space and sector space takes it as an argument.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Sector coordinate (identifies a sector in the world grid).
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct SectorCoord {
    /// X coordinate (in sectors, not world units).
    pub x: i32,
    /// Y coordinate (in sectors, not world units).
    pub y: i32,
}

impl SectorCoord {
    /// Creates a new sector coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world position to the sector containing it.
    ///
    /// Uses floor division so that negative positions land in negative
    /// sectors (`-0.5` is in sector `-1`, not `0`).
    #[inline]
    #[must_use]
    pub fn from_world_pos(position: Vec2, sector_size: f64) -> Self {
        Self {
            x: (position.x / sector_size).floor() as i32,
            y: (position.y / sector_size).floor() as i32,
        }
    }

    /// Returns the world position of the sector's origin (min corner).
    #[inline]
    #[must_use]
    pub fn origin(self, sector_size: f64) -> Vec2 {
        Vec2::new(f64::from(self.x) * sector_size, f64::from(self.y) * sector_size)
    }

    /// Returns the world position of the sector's center.
    #[inline]
    #[must_use]
    pub fn center(self, sector_size: f64) -> Vec2 {
        self.origin(sector_size) + Vec2::new(sector_size * 0.5, sector_size * 0.5)
    }

    /// Returns this coordinate shifted by `(dx, dy)` sectors, or `None` if
    /// the result leaves the `i32` grid.
    #[inline]
    #[must_use]
    pub const fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }
}

impl std::fmt::Display for SectorCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
