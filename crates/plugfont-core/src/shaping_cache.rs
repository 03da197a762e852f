//! Backend-agnostic shaping cache
//!
//! Measuring, hit-testing and drawing the same run usually happen back to
//! back, so each shaped run is kept in a small LRU keyed by everything that
//! can change the result.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::types::{Direction, ShapedRun, ShapingParams};

/// Key for caching shaping results
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapingCacheKey {
    pub text: String,
    /// Identity of the face (see `FontRef::cache_id`)
    pub font_id: u64,
    /// Bit pattern of the pixel size
    pub size: u32,
    pub direction: Direction,
    pub features: Vec<(String, u32)>,
    /// Bit patterns of letter and word spacing
    pub spacing: (u32, u32),
}

impl ShapingCacheKey {
    pub fn new(text: impl Into<String>, font_id: u64, params: &ShapingParams) -> Self {
        Self {
            text: text.into(),
            font_id,
            size: float_key(params.size),
            direction: params.direction,
            features: params.features.clone(),
            spacing: (
                float_key(params.letter_spacing),
                float_key(params.word_spacing),
            ),
        }
    }
}

/// Exact bits of a float, with both zeros mapped to one key
fn float_key(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe LRU of shaped runs
pub struct ShapingCache {
    entries: Mutex<LruCache<ShapingCacheKey, ShapedRun>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ShapingCache {
    /// Create a cache holding at most `capacity` runs (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &ShapingCacheKey) -> Option<ShapedRun> {
        let found = self.entries.lock().get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, key: ShapingCacheKey, run: ShapedRun) {
        self.entries.lock().put(key, run);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.lock().len(),
            capacity: self.capacity,
        }
    }
}
