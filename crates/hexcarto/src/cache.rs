//! Memo table for whole layout runs.
//!
//! Entries are keyed by a `u64`. `key` derives one from a boundary set using
//! the injected key function (content fingerprint by default). Inserts are
//! insert-if-absent: when two threads race on the same key the first stored
//! result wins and both callers receive it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::geo::BoundarySet;
use crate::layout::LayoutResult;

pub type KeyFn = Box<dyn Fn(&BoundarySet) -> u64 + Send + Sync>;

pub struct LayoutCache {
    key_fn: KeyFn,
    entries: Mutex<HashMap<u64, Arc<LayoutResult>>>,
}

impl LayoutCache {
    /// Keyed by `BoundarySet::fingerprint`.
    pub fn new() -> Self {
        Self::with_key_fn(BoundarySet::fingerprint)
    }

    pub fn with_key_fn(key_fn: impl Fn(&BoundarySet) -> u64 + Send + Sync + 'static) -> Self {
        Self {
            key_fn: Box::new(key_fn),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(&self, boundaries: &BoundarySet) -> u64 {
        (self.key_fn)(boundaries)
    }

    // Poisoning is ignored; every critical section is a single map call.
    fn entries(&self) -> MutexGuard<'_, HashMap<u64, Arc<LayoutResult>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: u64) -> Option<Arc<LayoutResult>> {
        self.entries().get(&key).cloned()
    }

    /// Cached result for `key`, computing it with `f` on a miss. `f` runs
    /// without the lock held.
    pub fn get_or_insert_with(&self, key: u64, f: impl FnOnce() -> LayoutResult) -> Arc<LayoutResult> {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "layout cache hit");
            return hit;
        }
        let fresh = Arc::new(f());
        Arc::clone(self.entries().entry(key).or_insert(fresh))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LayoutCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutCache").field("len", &self.len()).finish()
    }
}
