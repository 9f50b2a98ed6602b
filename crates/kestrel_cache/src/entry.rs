//! The shape shared by both caches.

/// A keyed cache with exact-match lookup and last-write-wins insertion.
///
/// Implementations never evict; entries live until explicitly removed or
/// cleared.
pub trait EntryCache {
    /// Lookup key.
    type Key;
    /// Stored entry, returned by value (entries are cheap to clone).
    type Entry;

    /// Returns the entry for `key`, if present.
    fn get(&self, key: &Self::Key) -> Option<Self::Entry>;

    /// Inserts `entry`, replacing any existing entry for `key`.
    fn put(&self, key: Self::Key, entry: Self::Entry);

    /// Returns `true` if an entry exists for `key`.
    fn contains(&self, key: &Self::Key) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
