//! Single-slot cell cache.
//!
//! [`CellCache`] keeps the most recently used [`TileHandle`]. A query whose
//! point the cached handle covers is answered from it; any other point opens
//! a new handle, which replaces the cached one.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::point::GeoPoint;
use crate::tile::TileHandle;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of handles currently cached (0 or 1).
    pub entry_count: u64,
    /// Number of queries answered by the cached handle.
    pub hit_count: u64,
    /// Number of queries that needed a new handle.
    pub miss_count: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// Cache holding at most one open cell.
///
/// The lock is held for the whole check-or-replace sequence, including the
/// open on a miss, so concurrent callers serialize and never open the same
/// cell twice in a row.
#[derive(Default)]
pub struct CellCache {
    slot: Mutex<Option<Box<dyn TileHandle>>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl CellCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `query` on the handle covering `point`.
    ///
    /// On a miss, `open` supplies the new handle. If it returns `None` the
    /// cached handle is kept and the result is `None`. Otherwise the new handle
    /// is installed first and the displaced one is closed afterwards.
    pub fn with_cell<T>(
        &self,
        point: &GeoPoint,
        open: impl FnOnce() -> Option<Box<dyn TileHandle>>,
        query: impl FnOnce(&dyn TileHandle) -> Option<T>,
    ) -> Option<T> {
        let mut slot = self.slot.lock();

        if let Some(handle) = slot.as_deref() {
            if handle.covers_point(point) {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                return query(handle);
            }
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        let handle = open()?;

        if let Some(mut previous) = slot.replace(handle) {
            previous.close();
        }

        match slot.as_deref() {
            Some(handle) => query(handle),
            None => None,
        }
    }

    /// Close and drop the cached handle, if any.
    pub fn clear(&self) {
        if let Some(mut handle) = self.slot.lock().take() {
            handle.close();
        }
    }

    /// Check whether no handle is cached.
    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: u64::from(!self.is_empty()),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}

impl Drop for CellCache {
    fn drop(&mut self) {
        if let Some(mut handle) = self.slot.get_mut().take() {
            handle.close();
        }
    }
}
