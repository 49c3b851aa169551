//! Kernel row cache
//!
//! The solver works on whole kernel rows Q_i = (K(x_i, x_0), ..., K(x_i, x_{n-1})).
//! Rows are kept in an LRU cache bounded by a byte budget so that the two rows
//! touched by every working-pair update are usually computed only once.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// LRU cache of kernel rows keyed by sample index
pub struct KernelCache {
    cache: LruCache<usize, Arc<[f64]>>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a new kernel cache holding at most `capacity` rows (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a kernel cache for rows of `row_len` values within `memory_bytes`
    ///
    /// Always keeps room for the two rows of a working pair.
    pub fn with_memory_limit(memory_bytes: usize, row_len: usize) -> Self {
        let row_bytes = (row_len * std::mem::size_of::<f64>()).max(1);
        Self::new((memory_bytes / row_bytes).max(2))
    }

    /// Get row `i`, computing and caching it on a miss
    pub fn row<F>(&mut self, i: usize, compute: F) -> Arc<[f64]>
    where
        F: FnOnce() -> Vec<f64>,
    {
        if let Some(row) = self.cache.get(&i) {
            self.hits += 1;
            return Arc::clone(row);
        }
        self.misses += 1;
        let row: Arc<[f64]> = compute().into();
        self.cache.put(i, Arc::clone(&row));
        row
    }

    /// Check whether row `i` is cached without touching the LRU order
    pub fn contains(&self, i: usize) -> bool {
        self.cache.contains(&i)
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}
