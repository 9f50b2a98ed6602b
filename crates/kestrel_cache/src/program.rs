//! The per-context program cache.

use std::collections::HashMap;
use std::fmt;

use kestrel_common::ContextId;
use parking_lot::RwLock;

use crate::entry::EntryCache;
use crate::key::ContextRoutineKey;
use crate::stats::{CacheStats, StatsSnapshot};

/// Maps (context, precision, routine) to a built program.
///
/// The cache does not observe context lifetimes. Whoever owns a context must
/// call [`remove_context`](ProgramCache::remove_context) when it is destroyed,
/// since its programs are no longer valid.
pub struct ProgramCache<P> {
    entries: RwLock<HashMap<ContextRoutineKey, P>>,
    stats: CacheStats,
}

impl<P: Clone> ProgramCache<P> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::new(),
        }
    }

    /// Returns the entry for `key` without counting a lookup.
    pub fn peek(&self, key: &ContextRoutineKey) -> Option<P> {
        self.entries.read().get(key).cloned()
    }

    /// Drops every program built for `context`, returning how many were removed.
    pub fn remove_context(&self, context: ContextId) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| key.context != context);
        before - entries.len()
    }

    /// Removes the entry for `key`, returning it.
    pub fn remove(&self, key: &ContextRoutineKey) -> Option<P> {
        self.entries.write().remove(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Current hit, miss, and insert counts.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl<P: Clone> Default for ProgramCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> EntryCache for ProgramCache<P> {
    type Key = ContextRoutineKey;
    type Entry = P;

    fn get(&self, key: &ContextRoutineKey) -> Option<P> {
        let found = self.entries.read().get(key).cloned();
        self.stats.record_lookup(found.is_some());
        found
    }

    fn put(&self, key: ContextRoutineKey, entry: P) {
        self.entries.write().insert(key, entry);
        self.stats.record_insert();
    }

    fn contains(&self, key: &ContextRoutineKey) -> bool {
        self.entries.read().contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl<P> fmt::Debug for ProgramCache<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramCache")
            .field("entries", &self.entries.read().len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
