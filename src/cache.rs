//! Process-lifetime lookup caches shared by every request.

use std::hash::Hash;

use dashmap::DashMap;

use crate::entities::Coordinates;

/// Concurrent map that never evicts. Same-key writers race benignly: they
/// store the same value.
#[derive(Debug)]
pub struct Cache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, V>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Route cache key. Coordinates are formatted to 6 decimals so that float
/// jitter below 1e-6 collapses onto the same entry.
pub fn route_key(start: Coordinates, end: Coordinates) -> String {
    format!(
        "{:.6},{:.6}-{:.6},{:.6}",
        start.lat, start.lon, end.lat, end.lon
    )
}
