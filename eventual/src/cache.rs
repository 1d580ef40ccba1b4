//! A fixed-size cache of futures.

use crate::future::Future;

use parking_lot::Mutex;

use std::fmt;

/// Caches futures by key in a ring buffer of fixed capacity.
///
/// Useful when many requests need the same slow result: the first caller
/// caches the pending future, later callers pick it up instead of starting
/// another fetch. Once full, every new key evicts the oldest entry.
///
/// # Examples
///
/// ```rust,ignore
/// let cache = FutureCache::new(16);
///
/// let page = match cache.get(&id) {
///     Some(page) => page,
///     None => {
///         let page = fetch(id);
///         cache.cache(id, page.clone());
///         page
///     }
/// };
/// ```
pub struct FutureCache<K, T> {
    ring: Mutex<Ring<K, T>>,
}

struct Ring<K, T> {
    slots: Vec<Option<(K, Future<T>)>>,
    next: usize,
}

impl<K, T> FutureCache<K, T>
where
    K: Eq,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a cache holding at most `capacity` futures.
    ///
    /// A cache of capacity zero never holds anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(Ring {
                slots: (0..capacity).map(|_| None).collect(),
                next: 0,
            }),
        }
    }

    /// Returns the number of futures the cache can hold.
    pub fn capacity(&self) -> usize {
        self.ring.lock().slots.len()
    }

    /// Returns `true` if a future is cached under `key`.
    pub fn is_cached(&self, key: &K) -> bool {
        self.ring.lock().position(key).is_some()
    }

    /// Returns the future cached under `key`.
    pub fn get(&self, key: &K) -> Option<Future<T>> {
        let ring = self.ring.lock();
        let pos = ring.position(key)?;

        ring.slots[pos].as_ref().map(|(_, future)| future.clone())
    }

    /// Caches `future` under `key`.
    ///
    /// Replaces the entry of a key that is already cached, otherwise
    /// takes the oldest slot.
    pub fn cache(&self, key: K, future: Future<T>) {
        let mut ring = self.ring.lock();
        let capacity = ring.slots.len();

        if capacity == 0 {
            return;
        }

        match ring.position(&key) {
            Some(pos) => ring.slots[pos] = Some((key, future)),
            None => {
                let next = ring.next;
                ring.slots[next] = Some((key, future));
                ring.next = (next + 1) % capacity;
            }
        }
    }
}

impl<K: Eq, T> Ring<K, T> {
    fn position(&self, key: &K) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|(k, _)| k == key))
    }
}

impl<K, T> fmt::Debug for FutureCache<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring.lock();

        f.debug_struct("FutureCache")
            .field("capacity", &ring.slots.len())
            .field("cached", &ring.slots.iter().flatten().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_future_is_returned() {
        let cache = FutureCache::new(2);
        cache.cache("a", Future::ready(1u32));

        assert!(cache.is_cached(&"a"));
        assert!(!cache.is_cached(&"b"));
        assert_eq!(cache.get(&"a").and_then(|f| f.result()), Some(1));
        assert!(cache.get(&"b").is_none());
    }

    #[test]
    fn oldest_entry_is_evicted() {
        let cache = FutureCache::new(2);
        cache.cache(1, Future::ready("one"));
        cache.cache(2, Future::ready("two"));
        cache.cache(3, Future::ready("three"));

        assert!(!cache.is_cached(&1));
        assert!(cache.is_cached(&2));
        assert!(cache.is_cached(&3));
    }

    #[test]
    fn recaching_a_key_replaces_it_in_place() {
        let cache = FutureCache::new(2);
        cache.cache(1, Future::ready(10u8));
        cache.cache(2, Future::ready(20u8));
        cache.cache(1, Future::ready(11u8));

        assert_eq!(cache.get(&1).and_then(|f| f.result()), Some(11));
        assert_eq!(cache.get(&2).and_then(|f| f.result()), Some(20));
    }

    #[test]
    fn zero_capacity_caches_nothing() {
        let cache = FutureCache::new(0);
        cache.cache(1, Future::ready(()));

        assert_eq!(cache.capacity(), 0);
        assert!(!cache.is_cached(&1));
    }
}
