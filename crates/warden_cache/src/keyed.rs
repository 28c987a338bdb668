//! In-process keyed cache.

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use warden_error::{CacheError, CacheResult};

/// Unbounded in-memory key/value cache.
///
/// There is no eviction and no TTL: callers own capacity discipline. The map is
/// copy-on-write, so [`items`](Self::items), [`keys`](Self::keys),
/// [`values`](Self::values) and `clone()` are cheap snapshots that never see
/// later mutations of the live cache, and mutating a clone never touches the
/// original.
///
/// The cache is not internally synchronized. Share it across tasks behind a
/// lock; concurrent writers get last-writer-wins.
///
/// # Example
///
/// ```
/// use warden_cache::KeyedCache;
///
/// let mut cache: KeyedCache<u64, String> = KeyedCache::new();
/// cache.put(781336284424699906, "guild".to_string());
///
/// assert_eq!(cache.get(&781336284424699906, String::new()), "guild");
/// assert_eq!(cache.get(&1, "none".to_string()), "none");
/// assert!(cache.remove(&1).is_err());
/// ```
#[derive(Clone)]
pub struct KeyedCache<K, V> {
    entries: Arc<HashMap<K, V>>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }

    /// Insert a value, overwriting any previous value for the key.
    pub fn put(&mut self, key: K, value: V) {
        Arc::make_mut(&mut self.entries).insert(key, value);
    }

    /// Get the stored value, or `default` when the key is absent.
    pub fn get(&self, key: &K, default: V) -> V {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    /// Borrow the stored value, if any.
    pub fn get_opt(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Read a value that must be present.
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if the key is absent.
    pub fn try_get(&self, key: &K) -> CacheResult<&V>
    where
        K: fmt::Debug,
    {
        self.entries
            .get(key)
            .ok_or_else(|| CacheError::key_not_found(key))
    }

    /// Remove a key and return its value.
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if the key is absent.
    pub fn remove(&mut self, key: &K) -> CacheResult<V>
    where
        K: fmt::Debug,
    {
        if !self.entries.contains_key(key) {
            tracing::debug!(key = ?key, "Remove of uncached key");
            return Err(CacheError::key_not_found(key));
        }
        Arc::make_mut(&mut self.entries)
            .remove(key)
            .ok_or_else(|| CacheError::key_not_found(key))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        // A fresh map leaves outstanding snapshots intact.
        self.entries = Arc::new(HashMap::new());
        tracing::debug!(cleared = count, "Cleared keyed cache");
    }

    /// Whether the key is cached.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every key/value pair.
    pub fn items(&self) -> CacheView<K, V> {
        CacheView {
            entries: Arc::clone(&self.entries),
        }
    }

    /// Snapshot of every key.
    pub fn keys(&self) -> KeysView<K, V> {
        KeysView(self.items())
    }

    /// Snapshot of every value.
    pub fn values(&self) -> ValuesView<K, V> {
        ValuesView(self.items())
    }

    /// Independent copy of the current contents.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

impl<K, V> Default for KeyedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for KeyedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedCache")
            .field("items", &self.entries.len())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for KeyedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

/// Point-in-time view of a [`KeyedCache`].
///
/// Iterating is lazy and can be repeated; every pass sees the same entries.
#[derive(Clone)]
pub struct CacheView<K, V> {
    entries: Arc<HashMap<K, V>>,
}

impl<K, V> CacheView<K, V> {
    /// Iterate the snapshot.
    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, K, V> IntoIterator for &'a CacheView<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Point-in-time view of a cache's keys.
#[derive(Clone)]
pub struct KeysView<K, V>(CacheView<K, V>);

impl<K, V> KeysView<K, V> {
    /// Iterate the keys.
    pub fn iter(&self) -> hash_map::Keys<'_, K, V> {
        self.0.entries.keys()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, K, V> IntoIterator for &'a KeysView<K, V> {
    type Item = &'a K;
    type IntoIter = hash_map::Keys<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Point-in-time view of a cache's values.
#[derive(Clone)]
pub struct ValuesView<K, V>(CacheView<K, V>);

impl<K, V> ValuesView<K, V> {
    /// Iterate the values.
    pub fn iter(&self) -> hash_map::Values<'_, K, V> {
        self.0.entries.values()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, K, V> IntoIterator for &'a ValuesView<K, V> {
    type Item = &'a V;
    type IntoIter = hash_map::Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
