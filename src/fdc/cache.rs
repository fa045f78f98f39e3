//! Bounded cache with time-to-live expiry and oldest-inserted eviction.
//!
//! Shared across concurrently scheduled lookups, so the interior state is
//! mutex-guarded. The clock is injectable for tests.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

type Clock = Box<dyn Fn() -> Instant + Send + Sync>;

struct CacheInner<K, V> {
    map: HashMap<K, (Instant, V)>,
    insertion_order: VecDeque<K>,
}

pub struct TtlCache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
    capacity: usize,
    ttl: Duration,
    clock: Clock,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Box::new(Instant::now))
    }

    pub fn with_clock(capacity: usize, ttl: Duration, clock: Clock) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
            capacity,
            ttl,
            clock,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = (self.clock)();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.map.get(key) {
            Some((inserted_at, value)) if now.duration_since(*inserted_at) < self.ttl => {
                Some(value.clone())
            }
            Some(_) => {
                inner.map.remove(key);
                inner.insertion_order.retain(|k| k != key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let now = (self.clock)();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.map.insert(key.clone(), (now, value)).is_none() {
            inner.insertion_order.push_back(key);
        }
        while inner.map.len() > self.capacity {
            match inner.insertion_order.pop_front() {
                Some(oldest) => {
                    inner.map.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .map
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything. Exposed for test isolation.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.map.clear();
        inner.insertion_order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// A clock the test can advance by hand.
    fn manual_clock() -> (Arc<AtomicU64>, Clock) {
        let offset = Arc::new(AtomicU64::new(0));
        let base = Instant::now();
        let handle = offset.clone();
        let clock: Clock =
            Box::new(move || base + Duration::from_secs(handle.load(Ordering::SeqCst)));
        (offset, clock)
    }

    #[test]
    fn test_basic_insert_get() {
        let cache: TtlCache<String, u32> = TtlCache::new(10, Duration::from_secs(3600));
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), None);
    }

    #[test]
    fn test_ttl_expiry() {
        let (offset, clock) = manual_clock();
        let cache: TtlCache<String, u32> =
            TtlCache::with_clock(10, Duration::from_secs(3600), clock);
        cache.insert("a".to_string(), 1);
        offset.store(3599, Ordering::SeqCst);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        offset.store(3600, Ordering::SeqCst);
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_oldest_inserted_evicted_first() {
        let cache: TtlCache<u32, u32> = TtlCache::new(3, Duration::from_secs(3600));
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);
        cache.insert(4, 4);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(2));
        assert_eq!(cache.get(&4), Some(4));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_reinsert_does_not_grow_order_queue() {
        let cache: TtlCache<u32, u32> = TtlCache::new(2, Duration::from_secs(3600));
        cache.insert(1, 1);
        cache.insert(1, 10);
        cache.insert(2, 2);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&2), Some(2));
        cache.insert(3, 3);
        // 1 is still the oldest insertion and goes first.
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear() {
        let cache: TtlCache<u32, u32> = TtlCache::new(10, Duration::from_secs(3600));
        cache.insert(1, 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
