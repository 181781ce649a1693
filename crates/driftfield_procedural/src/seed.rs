//! # Seed Derivation
//!
//! Every seed in the universe is derived from the root seed and a position:
//!
//! ```text
//! key  = "{root}_{x}_{y}"            (context empty)
//! key  = "{root}_{x}_{y}_{context}"  (otherwise)
//! seed = FNV-1a-64(key) as i64
//! ```
//!
//! ## Determinism Guarantee
//!
//! The key is formatted straight into the hasher, so no platform hasher,
//! locale or allocation is involved. Given the same inputs this produces
//! **exactly** the same seed on any platform, any time.

use std::fmt::{self, Write as _};

use driftfield_shared::{SectorCoord, DEFAULT_WORLD_SEED};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Streaming FNV-1a hasher.
struct Fnv1a(u64);

impl Fnv1a {
    const fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

impl fmt::Write for Fnv1a {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// FNV-1a 64 over raw bytes.
#[must_use]
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hasher = Fnv1a::new();
    hasher.write_bytes(bytes);
    hasher.0
}

/// Derives a seed from a root seed, a grid position and an optional context.
///
/// # Example
///
/// ```rust,ignore
/// let sector = derive_seed(1000, 3, -2, "");
/// let field = derive_seed(1000, 3, -2, "field");
/// assert_eq!(sector, -1258979128755286016);
/// ```
#[must_use]
pub fn derive_seed(root_seed: i64, x: i32, y: i32, context: &str) -> i64 {
    let mut hasher = Fnv1a::new();
    let written = if context.is_empty() {
        write!(hasher, "{root_seed}_{x}_{y}")
    } else {
        write!(hasher, "{root_seed}_{x}_{y}_{context}")
    };
    debug_assert!(written.is_ok(), "Fnv1a::write_str never fails");
    hasher.0 as i64
}

/// Opens a ChaCha8 stream from a derived seed.
#[must_use]
pub fn seeded_rng(seed: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Root seed of a universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(i64);

impl WorldSeed {
    /// Creates a world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Seed of a sector, optionally specialized by a context string.
    #[inline]
    #[must_use]
    pub fn sector_seed(self, coord: SectorCoord, context: &str) -> i64 {
        derive_seed(self.0, coord.x, coord.y, context)
    }

    /// Random stream for a sector.
    #[must_use]
    pub fn sector_rng(self, coord: SectorCoord) -> ChaCha8Rng {
        seeded_rng(self.sector_seed(coord, ""))
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(DEFAULT_WORLD_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_golden_values() {
        assert_eq!(derive_seed(1000, 3, -2, ""), -1_258_979_128_755_286_016);
        assert_eq!(derive_seed(1000, 3, -2, "field"), 7_213_287_376_426_485_695);
        assert_eq!(derive_seed(0, 0, 0, ""), 4_922_018_019_316_378_727);
        assert_eq!(derive_seed(1000, -3, 2, ""), -8_892_699_448_687_574_204);
    }

    #[test]
    fn test_empty_input_is_offset_basis() {
        assert_eq!(fnv1a_64(b""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_streamed_matches_buffered() {
        let key = format!("{}_{}_{}_{}", -77_i64, 12, -40, "moon_2");
        assert_eq!(derive_seed(-77, 12, -40, "moon_2"), fnv1a_64(key.as_bytes()) as i64);
    }

    #[test]
    fn test_context_and_sign_matter() {
        let base = derive_seed(1000, 3, -2, "");
        assert_ne!(base, derive_seed(1000, 3, -2, "planet"));
        assert_ne!(base, derive_seed(1000, -3, 2, ""));
        assert_ne!(base, derive_seed(1001, 3, -2, ""));
    }

    #[test]
    fn test_sector_seed_matches_free_function() {
        let seed = WorldSeed::new(1000);
        assert_eq!(
            seed.sector_seed(SectorCoord::new(3, -2), ""),
            derive_seed(1000, 3, -2, "")
        );
    }

    #[test]
    fn test_rng_streams_repeat() {
        let mut a = seeded_rng(-1_258_979_128_755_286_016);
        let mut b = seeded_rng(-1_258_979_128_755_286_016);
        for _ in 0..32 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }
}
