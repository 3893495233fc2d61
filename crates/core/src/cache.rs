//! Bounded in-memory cache of upstream model responses
//!
//! Entries are keyed by a fingerprint of the exact prompt and model and
//! evicted strictly in insertion order once the capacity is exceeded.
//! Reads do not refresh an entry's position.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Entries kept when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 100;

/// Cache key for a prompt sent to a model: 128 bits of SHA-256, hex encoded
pub fn fingerprint(prompt: &str, model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hasher.update(b"|");
    hasher.update(model.as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

/// Snapshot reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub cached_responses: usize,
    pub capacity: usize,
    pub cache_enabled: bool,
}

struct Inner<V> {
    entries: HashMap<String, V>,
    // front = oldest insertion
    order: VecDeque<String>,
}

/// FIFO-bounded response cache shared across requests
pub struct ResponseCache<V> {
    capacity: usize,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity + 1),
                order: VecDeque::with_capacity(capacity + 1),
            }),
        }
    }

    /// Cloned value for `key`, if cached
    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().entries.get(key).cloned()
    }

    /// Store `value` under `key`, evicting the oldest entry past capacity.
    ///
    /// Replacing an existing key keeps its original eviction position.
    pub fn put(&self, key: String, value: V) {
        let mut inner = self.lock();
        if inner.entries.insert(key.clone(), value).is_none() {
            inner.order.push_back(key);
        }
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached_responses: self.len(),
            capacity: self.capacity,
            cache_enabled: true,
        }
    }

    // A panic while holding the lock cannot leave the map and queue out of
    // step, so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fingerprint_is_stable_and_model_sensitive() {
        let a = fingerprint("prompt", "model-a");
        assert_eq!(a, fingerprint("prompt", "model-a"));
        assert_eq!(a.len(), 32);
        assert_ne!(a, fingerprint("prompt", "model-b"));
        assert_ne!(a, fingerprint("prompt ", "model-a"));
    }

    #[test]
    fn get_after_put_returns_value() {
        let cache = ResponseCache::new(10);
        cache.put("k".to_string(), "value".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("value"));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn oldest_entry_is_evicted_past_capacity() {
        let cache = ResponseCache::default();
        for i in 0..101 {
            cache.put(fingerprint(&format!("prompt {i}"), "m"), i);
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.get(&fingerprint("prompt 0", "m")), None);
        assert_eq!(cache.get(&fingerprint("prompt 1", "m")), Some(1));
        assert_eq!(cache.get(&fingerprint("prompt 100", "m")), Some(100));
    }

    #[test]
    fn reads_do_not_refresh_position() {
        let cache = ResponseCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.put("c".to_string(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn replacing_a_key_keeps_its_slot() {
        let cache = ResponseCache::new(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("a".to_string(), 10);
        assert_eq!(cache.len(), 2);
        cache.put("c".to_string(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn concurrent_puts_stay_bounded() {
        let cache = Arc::new(ResponseCache::new(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.put(format!("{t}-{i}"), i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 50);
        assert_eq!(cache.stats().cached_responses, 50);
    }
}
