//! Seeded asteroid visuals and their bounded cache.
//!
//! Visuals depend only on the record seed, so the cache is keyed by seed
//! and shared between every asteroid that happens to reuse one. When full,
//! the oldest inserted visual is evicted.

use std::sync::Arc;

use driftfield_procedural::{derive_seed, seeded_rng};
use driftfield_shared::Vec2;
use indexmap::IndexMap;
use rand::Rng;

/// Presentation data for an asteroid.
#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidVisual {
    /// Seed this visual was built from.
    pub seed: i64,
    /// Outline around the center, unit radius at most.
    pub outline: Vec<Vec2>,
    /// Number of craters painted on the surface.
    pub crater_count: u8,
    /// Base color, RGB.
    pub tint: [u8; 3],
}

impl AsteroidVisual {
    /// Builds the visual for a seed.
    #[must_use]
    pub fn generate(seed: i64) -> Self {
        let mut rng = seeded_rng(derive_seed(seed, 0, 0, "visual"));

        let vertices = rng.gen_range(7..=12_u32);
        let outline = (0..vertices)
            .map(|i| {
                let angle = std::f64::consts::TAU * f64::from(i) / f64::from(vertices);
                Vec2::from_angle(angle) * rng.gen_range(0.7..=1.0)
            })
            .collect();

        let grey = rng.gen_range(80..=150_u8);
        Self {
            seed,
            outline,
            crater_count: rng.gen_range(0..=5),
            tint: [
                grey.saturating_add(rng.gen_range(0..=30)),
                grey.saturating_add(rng.gen_range(0..=15)),
                grey,
            ],
        }
    }
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisualCacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that built a new visual.
    pub misses: u64,
    /// Visuals evicted to make room.
    pub evictions: u64,
}

/// Bounded seed -> visual cache with oldest-inserted eviction.
#[derive(Debug)]
pub struct VisualCache {
    capacity: usize,
    entries: IndexMap<i64, Arc<AsteroidVisual>>,
    stats: VisualCacheStats,
}

impl VisualCache {
    /// Creates a cache. A capacity of zero disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: IndexMap::with_capacity(capacity),
            stats: VisualCacheStats::default(),
        }
    }

    /// Returns the visual for a seed, building it on a miss.
    pub fn get_or_build(&mut self, seed: i64) -> Arc<AsteroidVisual> {
        if let Some(visual) = self.entries.get(&seed) {
            self.stats.hits += 1;
            return Arc::clone(visual);
        }

        self.stats.misses += 1;
        let visual = Arc::new(AsteroidVisual::generate(seed));
        if self.capacity == 0 {
            return visual;
        }

        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
            self.stats.evictions += 1;
        }
        self.entries.insert(seed, Arc::clone(&visual));
        visual
    }

    /// Checks if a seed is cached.
    #[must_use]
    pub fn contains(&self, seed: i64) -> bool {
        self.entries.contains_key(&seed)
    }

    /// Number of cached visuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counters.
    #[must_use]
    pub const fn stats(&self) -> VisualCacheStats {
        self.stats
    }
}
