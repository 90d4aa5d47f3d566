//! ChainHashMap: a fixed array of bucket chains over a generational entry arena.

use crate::bucket_hasher::{BucketHasher, CharSum};
use crate::config::{ConfigError, MapConfig, DEFAULT_BUCKET_COUNT};
use core::fmt;
use core::num::NonZeroUsize;
use slotmap::{DefaultKey, SlotMap};
use tracing::{debug, trace};

const DEFAULT_BUCKETS: NonZeroUsize = match NonZeroUsize::new(DEFAULT_BUCKET_COUNT) {
    Some(n) => n,
    None => panic!("DEFAULT_BUCKET_COUNT must be non-zero"),
};

/// Names one stored entry. Stays valid until that entry is removed; a
/// handle to a removed entry never resolves again, even after its slot is
/// reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, V, S>(&self, map: &'a ChainHashMap<V, S>) -> Option<&'a str> {
        map.handle_key(*self)
    }

    pub fn value<'a, V, S>(&self, map: &'a ChainHashMap<V, S>) -> Option<&'a V> {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, V, S>(&self, map: &'a mut ChainHashMap<V, S>) -> Option<&'a mut V> {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    bucket: usize, // chain holding this entry; never recomputed
}

/// Separately chained map from string keys to `V`.
///
/// The bucket count is fixed at construction and the map never rehashes.
/// Each bucket is an ordered chain: new keys are appended, overwrites keep
/// their position, and removal preserves the order of the remaining
/// entries. Lookups scan one chain linearly, so the average cost is
/// O(len / bucket_count).
///
/// Mutation takes `&mut self`; to share a map across threads, wrap it in a
/// `Mutex` or `RwLock`.
pub struct ChainHashMap<V, S = CharSum> {
    hasher: S,
    bucket_count: NonZeroUsize,
    buckets: Box<[Vec<DefaultKey>]>,
    slots: SlotMap<DefaultKey, Entry<V>>, // storage using generational keys
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key already present in map"),
        }
    }
}

impl std::error::Error for InsertError {}

impl<V> ChainHashMap<V> {
    /// Empty map with `DEFAULT_BUCKET_COUNT` buckets.
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_BUCKETS, 0, CharSum)
    }

    pub fn with_bucket_count(bucket_count: usize) -> Result<Self, ConfigError> {
        Self::with_config(MapConfig::builder().bucket_count(bucket_count).build()?)
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, CharSum)
    }
}

impl<V> Default for ChainHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over immutable entries in `ChainHashMap`.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Handle, &'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, e)| (Handle(k), e.key.as_str(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over mutable entries in `ChainHashMap`.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (Handle, &'a str, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, e)| (Handle(k), e.key.as_str(), &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V, S> ChainHashMap<V, S>
where
    S: BucketHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(DEFAULT_BUCKETS, 0, hasher)
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self, ConfigError> {
        let bucket_count = config.validate()?;
        Ok(Self::from_parts(bucket_count, config.capacity, hasher))
    }

    /// Bucket index for `key`. Panics if the hasher breaks its range contract.
    pub fn bucket_of(&self, key: &str) -> usize {
        let bucket = self.hasher.bucket_of(key, self.bucket_count);
        assert!(
            bucket < self.bucket_count.get(),
            "bucket hasher returned index {} for {} buckets",
            bucket,
            self.bucket_count
        );
        bucket
    }

    fn position(&self, bucket: usize, key: &str) -> Option<usize> {
        self.buckets[bucket].iter().position(|&k| {
            self.slots
                .get(k)
                .map(|e| e.key == key)
                .unwrap_or(false)
        })
    }

    fn find_slot(&self, key: &str) -> Option<DefaultKey> {
        let bucket = self.bucket_of(key);
        self.position(bucket, key).map(|pos| self.buckets[bucket][pos])
    }

    /// Store `value` under `key`. An existing entry is overwritten in place
    /// and its previous value returned; otherwise a new entry is appended to
    /// the end of the key's chain.
    pub fn set<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: AsRef<str> + Into<String>,
    {
        let bucket = self.bucket_of(key.as_ref());
        if let Some(pos) = self.position(bucket, key.as_ref()) {
            let slot = self.buckets[bucket][pos];
            trace!(target: "chain_hashmap", key = key.as_ref(), bucket, "overwrite");
            return self
                .slots
                .get_mut(slot)
                .map(|e| core::mem::replace(&mut e.value, value));
        }
        self.link(bucket, key.into(), value);
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let slot = self.find_slot(key)?;
        self.slots.get(slot).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let slot = self.find_slot(key)?;
        self.slots.get_mut(slot).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_slot(key).is_some()
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        self.find_slot(key).map(Handle)
    }

    /// Delete the entry for `key`. Returns `false`, leaving the map
    /// untouched, when the key is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Like `remove`, but hands back the owned key and value.
    pub fn take(&mut self, key: &str) -> Option<(String, V)> {
        let bucket = self.bucket_of(key);
        let pos = self.position(bucket, key)?;
        // Vec::remove keeps the rest of the chain in order.
        let slot = self.buckets[bucket].remove(pos);
        let entry = self.slots.remove(slot)?;
        trace!(target: "chain_hashmap", key = entry.key.as_str(), bucket, "remove");
        Some((entry.key, entry.value))
    }

    /// Insert only if `key` is absent; the map is unchanged on error.
    pub fn insert<K>(&mut self, key: K, value: V) -> Result<Handle, InsertError>
    where
        K: AsRef<str> + Into<String>,
    {
        self.insert_with(key, || value)
    }

    /// Like `insert`, but `default` runs only when the key is absent.
    pub fn insert_with<K, F>(&mut self, key: K, default: F) -> Result<Handle, InsertError>
    where
        K: AsRef<str> + Into<String>,
        F: FnOnce() -> V,
    {
        let bucket = self.bucket_of(key.as_ref());
        if self.position(bucket, key.as_ref()).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let value = default();
        Ok(Handle(self.link(bucket, key.into(), value)))
    }
}

impl<V, S> ChainHashMap<V, S> {
    fn from_parts(bucket_count: NonZeroUsize, capacity: usize, hasher: S) -> Self {
        debug!(
            target: "chain_hashmap",
            bucket_count = bucket_count.get(),
            capacity,
            "created map"
        );
        Self {
            hasher,
            bucket_count,
            buckets: (0..bucket_count.get()).map(|_| Vec::new()).collect(),
            slots: SlotMap::with_capacity_and_key(capacity),
        }
    }

    fn link(&mut self, bucket: usize, key: String, value: V) -> DefaultKey {
        trace!(target: "chain_hashmap", key = key.as_str(), bucket, "append");
        let slot = self.slots.insert(Entry { key, value, bucket });
        self.buckets[bucket].push(slot);
        slot
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count.get()
    }

    /// Number of entries chained in bucket `index`, or `None` if out of range.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Vec::len)
    }

    /// Keys of bucket `index` in chain order.
    pub fn bucket_keys(&self, index: usize) -> Option<impl Iterator<Item = &str> + '_> {
        let chain = self.buckets.get(index)?;
        Some(
            chain
                .iter()
                .filter_map(move |&k| self.slots.get(k).map(|e| e.key.as_str())),
        )
    }

    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Average chain length. Grows without bound since the map never resizes.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count.get() as f64
    }

    /// Remove every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        debug!(target: "chain_hashmap", entries = self.slots.len(), "clear");
        for chain in self.buckets.iter_mut() {
            chain.clear();
        }
        self.slots.clear();
    }

    pub fn remove_handle(&mut self, handle: Handle) -> Option<(String, V)> {
        let entry = self.slots.remove(handle.0)?;
        let chain = &mut self.buckets[entry.bucket];
        if let Some(pos) = chain.iter().position(|&k| k == handle.0) {
            chain.remove(pos);
        }
        trace!(
            target: "chain_hashmap",
            key = entry.key.as_str(),
            bucket = entry.bucket,
            "remove"
        );
        Some((entry.key, entry.value))
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&str> {
        self.slots.get(h.0).map(|e| e.key.as_str())
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        self.slots.get(h.0).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        self.slots.get_mut(h.0).map(|e| &mut e.value)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for ChainHashMap<V, S>
where
    K: AsRef<str> + Into<String>,
    S: BucketHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<V: fmt::Debug, S> fmt::Debug for ChainHashMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.values().map(|e| (&e.key, &e.value)))
            .finish()
    }
}
