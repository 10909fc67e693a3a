//! Bounded itinerary cache keyed by rendered prompt text

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use tracing::debug;

use super::ItineraryResult;

/// Process-lifetime LRU map from prompt text to finished results
///
/// A capacity of zero disables caching. The lock is never held across an
/// await point.
pub struct ItineraryCache {
    entries: Option<Mutex<LruCache<String, ItineraryResult>>>,
}

impl ItineraryCache {
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "ItineraryCache::new: called");
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Look up a prompt, marking it most recently used
    pub fn get(&self, prompt: &str) -> Option<ItineraryResult> {
        let entries = self.entries.as_ref()?;
        let mut entries = entries.lock().unwrap_or_else(|e| e.into_inner());
        let hit = entries.get(prompt).cloned();
        debug!(hit = hit.is_some(), "ItineraryCache::get: called");
        hit
    }

    /// Store a finished result, evicting the least recently used entry when full
    pub fn insert(&self, prompt: String, result: ItineraryResult) {
        let Some(entries) = self.entries.as_ref() else {
            return;
        };
        let mut entries = entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((displaced, _)) = entries.push(prompt, result) {
            debug!(displaced_len = displaced.len(), "ItineraryCache::insert: displaced entry");
        }
    }

    /// Check membership without touching recency
    pub fn contains(&self, prompt: &str) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.lock().unwrap_or_else(|e| e.into_inner()).contains(prompt))
    }

    pub fn len(&self) -> usize {
        self.entries
            .as_ref()
            .map_or(0, |entries| entries.lock().unwrap_or_else(|e| e.into_inner()).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries
            .as_ref()
            .map_or(0, |entries| entries.lock().unwrap_or_else(|e| e.into_inner()).cap().get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(s: &str) -> ItineraryResult {
        ItineraryResult::Ready(s.to_string())
    }

    #[test]
    fn test_get_and_insert() {
        let cache = ItineraryCache::new(2);
        assert!(cache.get("a").is_none());

        cache.insert("a".to_string(), ready("plan a"));
        assert_eq!(cache.get("a"), Some(ready("plan a")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = ItineraryCache::new(2);
        cache.insert("a".to_string(), ready("plan a"));
        cache.insert("b".to_string(), ready("plan b"));

        // Touch "a" so "b" becomes the oldest
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), ItineraryResult::Unavailable);

        assert!(cache.get("b").is_none());
        assert!(cache.contains("a"));
        assert_eq!(cache.get("c"), Some(ItineraryResult::Unavailable));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_overflow_beyond_capacity() {
        let cache = ItineraryCache::new(10);
        for i in 0..11 {
            cache.insert(format!("prompt {}", i), ready("plan"));
        }
        assert_eq!(cache.len(), 10);
        assert!(cache.get("prompt 0").is_none());
        assert!(cache.get("prompt 10").is_some());
    }

    #[test]
    fn test_reinsert_replaces_value() {
        let cache = ItineraryCache::new(2);
        cache.insert("a".to_string(), ItineraryResult::Unavailable);
        cache.insert("a".to_string(), ready("plan a"));
        assert_eq!(cache.get("a"), Some(ready("plan a")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = ItineraryCache::new(0);
        cache.insert("a".to_string(), ready("plan a"));
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }
}
