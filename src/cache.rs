use indexmap::IndexMap;

use crate::metadata::ScanMetadata;

/// How many scans' metadata to keep by default
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/**
A bounded cache from scan number to computed [`ScanMetadata`], used because
the same scan's metadata is requested repeatedly across a processing
pipeline.

Eviction is by *insertion* order: re-`put`ting a key moves it to the
most-recently-inserted end, but reads never reorder anything, so this is
not a true access-order LRU. A wrapper around [`indexmap::IndexMap`],
whose ordering supplies the eviction queue.

There is no internal locking; callers needing concurrent access must add
their own mutual exclusion around `get`/`put`.
*/
#[derive(Debug, Clone)]
pub struct ScanMetadataCache {
    entries: IndexMap<u32, ScanMetadata>,
    capacity: usize,
}

impl Default for ScanMetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ScanMetadataCache {
    /// Create a cache holding at most `capacity` entries. A capacity of 0
    /// disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity,
        }
    }

    #[inline]
    pub fn get(&self, scan_number: u32) -> Option<&ScanMetadata> {
        self.entries.get(&scan_number)
    }

    #[inline]
    pub fn contains(&self, scan_number: u32) -> bool {
        self.entries.contains_key(&scan_number)
    }

    /// Insert `metadata` for `scan_number`, evicting the least recently
    /// *inserted* entries first once the cache is full.
    ///
    /// An already-present key is removed and re-appended at the
    /// most-recently-inserted end.
    pub fn put(&mut self, scan_number: u32, metadata: ScanMetadata) {
        if self.capacity == 0 {
            return;
        }
        self.entries.shift_remove(&scan_number);
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(scan_number, metadata);
    }

    /// Change the maximum entry count. Shrinking below the current size
    /// evicts the oldest entries immediately; 0 disables caching and
    /// clears the cache.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if capacity == 0 {
            self.entries.clear();
            return;
        }
        while self.entries.len() > capacity {
            self.entries.shift_remove_index(0);
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over the cached entries in insertion (eviction) order
    pub fn iter(&self) -> indexmap::map::Iter<'_, u32, ScanMetadata> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn meta(scan_number: u32) -> ScanMetadata {
        ScanMetadata::from_filter_text(
            scan_number,
            "FTMS + p NSI Full ms [400.00-2000.00]",
            vec![],
        )
    }

    fn cached_scans(cache: &ScanMetadataCache) -> Vec<u32> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_put_get() {
        let mut cache = ScanMetadataCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
        assert!(cache.get(1).is_none());
        cache.put(1, meta(1));
        assert_eq!(cache.get(1).unwrap().scan_number, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_is_by_insertion_order() {
        let mut cache = ScanMetadataCache::new(3);
        for i in 1..=3 {
            cache.put(i, meta(i));
        }
        // Reading the oldest entry must not protect it from eviction
        assert!(cache.get(1).is_some());
        cache.put(4, meta(4));
        assert_eq!(cached_scans(&cache), vec![2, 3, 4]);
    }

    #[test]
    fn test_reinsert_moves_to_newest_end() {
        let mut cache = ScanMetadataCache::new(3);
        for i in 1..=3 {
            cache.put(i, meta(i));
        }
        cache.put(1, meta(1));
        assert_eq!(cached_scans(&cache), vec![2, 3, 1]);
        cache.put(4, meta(4));
        assert_eq!(cached_scans(&cache), vec![3, 1, 4]);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let mut cache = ScanMetadataCache::new(0);
        cache.put(1, meta(1));
        assert!(cache.is_empty());

        let mut cache = ScanMetadataCache::new(4);
        for i in 1..=4 {
            cache.put(i, meta(i));
        }
        cache.set_capacity(0);
        assert!(cache.is_empty());
        cache.put(5, meta(5));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shrinking_evicts_immediately() {
        let mut cache = ScanMetadataCache::new(5);
        for i in 1..=5 {
            cache.put(i, meta(i));
        }
        cache.set_capacity(2);
        assert_eq!(cached_scans(&cache), vec![4, 5]);
        cache.put(6, meta(6));
        assert_eq!(cached_scans(&cache), vec![5, 6]);
    }
}
