//! Bounded cache of computed suggestion lists.
//!
//! Each entry remembers the logical time of its last access. When the cache
//! is full, the oldest 20% of entries (at least one) are dropped before a new
//! entry is inserted.

use std::collections::HashMap;

use tracing::debug;

use crate::matcher::MatchType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub input: String,
    pub match_type: MatchType,
    pub case_sensitive: bool,
}

struct CacheEntry {
    results: Vec<String>,
    last_access: u64,
}

pub struct ResultCache {
    entries: HashMap<CacheKey, CacheEntry>,
    clock: u64,
    capacity: usize,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            clock: 0,
            capacity: capacity.max(1),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Cached results for `key`, refreshing its access time.
    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<String>> {
        let now = self.tick();
        let entry = self.entries.get_mut(key)?;
        entry.last_access = now;
        Some(entry.results.clone())
    }

    pub fn insert(&mut self, key: CacheKey, results: Vec<String>) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.evict_oldest();
        }
        let now = self.tick();
        self.entries.insert(
            key,
            CacheEntry {
                results,
                last_access: now,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        let to_remove = (count / 5).max(1);
        let mut by_age: Vec<(u64, CacheKey)> = self
            .entries
            .iter()
            .map(|(k, e)| (e.last_access, k.clone()))
            .collect();
        // Partition so the `to_remove` least recently used land in front.
        by_age.select_nth_unstable_by_key(to_remove - 1, |(t, _)| *t);
        for (_, key) in &by_age[..to_remove] {
            self.entries.remove(key);
        }
        debug!(evicted = to_remove, remaining = self.entries.len(), "cache eviction");
    }

    /// Change the capacity. Shrinking below the current size evicts down
    /// to the new bound.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
