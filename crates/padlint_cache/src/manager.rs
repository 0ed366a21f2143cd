//! Bounded FIFO cache of check results.

use indexmap::IndexMap;
use tracing::debug;

use padlint_client::Issue;
use padlint_text::Fingerprint;

use crate::CacheEntry;

/// Default number of entries kept.
pub const DEFAULT_CAPACITY: usize = 10;

/// Caches checker results by content fingerprint.
///
/// Eviction is strict FIFO by insertion order: lookups do not refresh an
/// entry, and replacing the value of an existing key keeps its position.
#[derive(Debug, Clone)]
pub struct ResultCache {
    entries: IndexMap<Fingerprint, CacheEntry>,
    capacity: usize,
    enabled: bool,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ResultCache {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero behaves like a disabled cache.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
            enabled: true,
        }
    }

    /// Disables caching. Existing entries are kept but not served.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Enables caching.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Returns whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.capacity > 0
    }

    /// Gets the cached entry for a fingerprint.
    pub fn get(&self, fingerprint: Fingerprint) -> Option<&CacheEntry> {
        if !self.is_enabled() {
            return None;
        }
        self.entries.get(&fingerprint)
    }

    /// Gets the cached issues for a fingerprint.
    pub fn issues(&self, fingerprint: Fingerprint) -> Option<&[Issue]> {
        self.get(fingerprint).map(|entry| entry.issues.as_slice())
    }

    /// Stores issues for a fingerprint, evicting the oldest entry when full.
    pub fn put(&mut self, fingerprint: Fingerprint, issues: Vec<Issue>) {
        if !self.is_enabled() {
            return;
        }

        let entry = CacheEntry::new(fingerprint, issues);

        if let Some(existing) = self.entries.get_mut(&fingerprint) {
            *existing = entry;
            debug!("Replaced cache entry {}", fingerprint);
            return;
        }

        if self.entries.len() >= self.capacity
            && let Some((evicted, _)) = self.entries.shift_remove_index(0)
        {
            debug!("Evicted cache entry {}", evicted);
        }

        self.entries.insert(fingerprint, entry);
        debug!(
            "Cached {} ({} of {})",
            fingerprint,
            self.entries.len(),
            self.capacity
        );
    }

    /// Removes the entry for a fingerprint.
    pub fn remove(&mut self, fingerprint: Fingerprint) -> Option<CacheEntry> {
        self.entries.shift_remove(&fingerprint)
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!("Cleared {} cache entries", self.entries.len());
        }
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fingerprints from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = Fingerprint> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn issue(offset: u32) -> Issue {
        Issue::new(offset, 1, format!("issue at {offset}"))
    }

    fn fp(raw: i32) -> Fingerprint {
        Fingerprint::from_raw(raw)
    }

    #[test]
    fn test_put_then_get() {
        let mut cache = ResultCache::default();
        let key = Fingerprint::of("Teh cat sat.");

        cache.put(key, vec![issue(0)]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.issues(key), Some(&[issue(0)][..]));
        assert_eq!(cache.get(key).unwrap().fingerprint, key);
    }

    #[test]
    fn test_get_missing() {
        let cache = ResultCache::default();
        assert!(cache.get(fp(42)).is_none());
    }

    #[test]
    fn test_empty_issue_list_is_cached() {
        let mut cache = ResultCache::default();
        cache.put(fp(1), Vec::new());
        assert_eq!(cache.issues(fp(1)), Some(&[][..]));
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(ResultCache::default().capacity(), 10);
    }

    #[rstest]
    #[case::default_capacity(10)]
    #[case::tiny(1)]
    #[case::small(3)]
    fn test_fifo_eviction_after_capacity_plus_one(#[case] capacity: usize) {
        let mut cache = ResultCache::new(capacity);

        for i in 0..=capacity as i32 {
            cache.put(fp(i), vec![issue(i as u32)]);
        }

        assert_eq!(cache.len(), capacity);
        assert!(cache.get(fp(0)).is_none());
        for i in 1..=capacity as i32 {
            assert!(cache.get(fp(i)).is_some(), "entry {i} should remain");
        }
    }

    #[test]
    fn test_lookup_does_not_refresh_order() {
        let mut cache = ResultCache::new(2);
        cache.put(fp(1), vec![]);
        cache.put(fp(2), vec![]);

        assert!(cache.get(fp(1)).is_some());
        cache.put(fp(3), vec![]);

        assert!(cache.get(fp(1)).is_none());
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec![fp(2), fp(3)]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut cache = ResultCache::new(2);
        cache.put(fp(1), vec![issue(1)]);
        cache.put(fp(2), vec![]);
        cache.put(fp(1), vec![issue(9)]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.issues(fp(1)), Some(&[issue(9)][..]));
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec![fp(1), fp(2)]);

        // Key 1 is still the oldest.
        cache.put(fp(3), vec![]);
        assert!(cache.get(fp(1)).is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = ResultCache::default();
        cache.put(fp(1), vec![]);
        cache.put(fp(2), vec![]);

        assert!(cache.remove(fp(1)).is_some());
        assert!(cache.remove(fp(1)).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache() {
        let mut cache = ResultCache::default();
        cache.put(fp(1), vec![]);
        cache.disable();

        assert!(!cache.is_enabled());
        assert!(cache.get(fp(1)).is_none());

        cache.put(fp(2), vec![]);
        cache.enable();
        assert!(cache.get(fp(1)).is_some());
        assert!(cache.get(fp(2)).is_none());
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache = ResultCache::new(0);
        cache.put(fp(1), vec![]);
        assert!(cache.is_empty());
        assert!(!cache.is_enabled());
    }
}
