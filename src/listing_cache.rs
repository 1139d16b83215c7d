//! Whole-list cache for hot listings.
//!
//! Holds at most one snapshot. A snapshot is published as an `Arc`, so a
//! reader either sees a complete list or nothing at all. Any write to the
//! underlying table must call [`ListingCache::invalidate`]; there is no
//! per-key invalidation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct ListingCache<T> {
    name: &'static str,
    slot: Mutex<Option<Arc<Vec<T>>>>,
}

impl<T> ListingCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Mutex::new(None),
        }
    }

    // The slot only ever holds a finished snapshot, so a poisoned lock
    // still guards consistent data.
    fn slot(&self) -> MutexGuard<'_, Option<Arc<Vec<T>>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached snapshot, or run `load` and publish its result.
    ///
    /// A failed load leaves the cache empty.
    pub fn get_or_load<E, F>(&self, load: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        if let Some(hit) = self.slot().as_ref() {
            tracing::debug!(cache = self.name, "Listing cache hit");
            return Ok(Arc::clone(hit));
        }

        tracing::debug!(cache = self.name, "Listing cache miss");
        let fresh = Arc::new(load()?);
        *self.slot() = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    /// Drop the snapshot. The next read reloads from storage.
    pub fn invalidate(&self) {
        if self.slot().take().is_some() {
            tracing::debug!(cache = self.name, "Listing cache invalidated");
        }
    }

    pub fn is_populated(&self) -> bool {
        self.slot().is_some()
    }
}
