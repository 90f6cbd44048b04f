//! Process-wide TTL cache shared by concurrent quotations.
//!
//! Entries are spread over independently locked LRU shards so readers of
//! different keys rarely contend. Writes are last-writer-wins. Expired
//! entries are kept until evicted or cleared so callers can still read them
//! as a stale fallback.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

/// Time a collaborator call may take: `cap`, shortened to what is left
/// before `deadline`. Zero once the deadline has passed.
pub(crate) fn remaining_budget(deadline: Option<Instant>, cap: Duration) -> Duration {
    match deadline {
        Some(at) => at.saturating_duration_since(Instant::now()).min(cap),
        None => cap,
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Fresh(V),
    Stale(V),
    Miss,
}

pub struct TtlCache<K, V> {
    shards: Vec<Mutex<LruCache<K, Entry<V>>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// `capacity` is per shard. Zero values are bumped to one.
    pub fn new(ttl: Duration, shards: usize, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let shards = (0..shards.max(1))
            .map(|_| Mutex::new(LruCache::new(capacity)))
            .collect();
        Self { shards, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn shard(&self, key: &K) -> &Mutex<LruCache<K, Entry<V>>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    pub fn lookup(&self, key: &K) -> Lookup<V> {
        // A poisoned shard behaves as empty.
        let Ok(mut shard) = self.shard(key).lock() else {
            return Lookup::Miss;
        };
        match shard.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Lookup::Fresh(entry.value.clone()),
            Some(entry) => Lookup::Stale(entry.value.clone()),
            None => Lookup::Miss,
        }
    }

    /// Value only if it has not yet expired.
    pub fn get_fresh(&self, key: &K) -> Option<V> {
        match self.lookup(key) {
            Lookup::Fresh(value) => Some(value),
            _ => None,
        }
    }

    /// Value regardless of age.
    pub fn get_any(&self, key: &K) -> Option<V> {
        match self.lookup(key) {
            Lookup::Fresh(value) | Lookup::Stale(value) => Some(value),
            Lookup::Miss => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let key_shard = self.shard(&key);
        if let Ok(mut shard) = key_shard.lock() {
            shard.put(
                key,
                Entry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            if let Ok(mut shard) = shard.lock() {
                shard.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .filter_map(|shard| shard.lock().ok().map(|s| s.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
