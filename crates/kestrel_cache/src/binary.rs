//! The process-wide binary cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use kestrel_common::ContentHash;
use parking_lot::{Mutex, RwLock};

use crate::entry::EntryCache;
use crate::error::CacheError;
use crate::key::RoutineKey;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::store::BinaryStore;

/// A shared per-key lock serializing compilation of one routine key.
pub type KeyLock = Arc<Mutex<()>>;

/// A compiled device binary and the fingerprint of the build options used to
/// produce it.
///
/// The bytes are immutable and shared; cloning is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct CompiledBinary {
    bytes: Arc<[u8]>,
    options_fingerprint: ContentHash,
}

impl CompiledBinary {
    /// Wraps binary bytes produced with options hashing to `options_fingerprint`.
    pub fn new(bytes: impl Into<Arc<[u8]>>, options_fingerprint: ContentHash) -> Self {
        Self {
            bytes: bytes.into(),
            options_fingerprint,
        }
    }

    /// The binary payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Fingerprint of the build options the binary was compiled with.
    pub fn options_fingerprint(&self) -> ContentHash {
        self.options_fingerprint
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for CompiledBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledBinary")
            .field("len", &self.bytes.len())
            .field("options_fingerprint", &self.options_fingerprint)
            .finish()
    }
}

/// Maps (device, precision, routine) to the binary produced by a full compile.
///
/// Shared by every context on every device; usually accessed through
/// [`BinaryCache::global`] but any instance can be passed to a compiler.
#[derive(Default)]
pub struct BinaryCache {
    entries: RwLock<HashMap<RoutineKey, CompiledBinary>>,
    locks: Mutex<HashMap<RoutineKey, KeyLock>>,
    stats: CacheStats,
}

static GLOBAL: OnceLock<BinaryCache> = OnceLock::new();

impl BinaryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first use.
    pub fn global() -> &'static BinaryCache {
        GLOBAL.get_or_init(BinaryCache::new)
    }

    /// Returns the lock guarding compilation of `key`.
    ///
    /// Every call for an equal key returns the same lock.
    pub fn key_lock(&self, key: &RoutineKey) -> KeyLock {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Removes the entry for `key`, returning it.
    pub fn remove(&self, key: &RoutineKey) -> Option<CompiledBinary> {
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

    /// Returns the keys of every cached binary, in no particular order.
    pub fn keys(&self) -> Vec<RoutineKey> {
        self.entries.read().keys().cloned().collect()
    }

    /// Loads every valid binary from `store`, returning how many were added.
    ///
    /// Entries already in memory are kept. Invalid files are skipped.
    pub fn warm_from(&self, store: &BinaryStore) -> Result<usize, CacheError> {
        let loaded = store.load_all()?;
        let mut entries = self.entries.write();
        let mut added = 0;
        for (key, binary) in loaded {
            if !entries.contains_key(&key) {
                entries.insert(key, binary);
                self.stats.record_insert();
                added += 1;
            }
        }
        tracing::debug!(added, dir = %store.root().display(), "warmed binary cache");
        Ok(added)
    }
}

impl EntryCache for BinaryCache {
    type Key = RoutineKey;
    type Entry = CompiledBinary;

    fn get(&self, key: &RoutineKey) -> Option<CompiledBinary> {
        let found = self.entries.read().get(key).cloned();
        self.stats.record_lookup(found.is_some());
        found
    }

    fn put(&self, key: RoutineKey, entry: CompiledBinary) {
        self.entries.write().insert(key, entry);
        self.stats.record_insert();
    }

    fn contains(&self, key: &RoutineKey) -> bool {
        self.entries.read().contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl fmt::Debug for BinaryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryCache")
            .field("entries", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
