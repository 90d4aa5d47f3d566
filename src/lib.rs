//! chain-hashmap: a separately chained map from string keys to values,
//! with a bucket count fixed at construction.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small chaining hash table whose behavior can
//!   be read straight off the code: pick a bucket, scan its chain.
//! - Layers:
//!   - BucketHasher: pure function from `(key, bucket_count)` to a bucket
//!     index. The default, `CharSum`, adds up the scalar values of the
//!     key's characters.
//!   - MapConfig: validated construction parameters (bucket count,
//!     reserved entry capacity).
//!   - ChainHashMap<V, S>: a boxed slice of chains, each an ordered list of
//!     slot keys into a generational entry arena.
//!
//! Constraints
//! - The bucket count never changes; there is no rehashing. Chains grow
//!   with the load factor.
//! - Keys are strings. A key appears in at most one chain position.
//! - Each entry records its bucket, so handle-based removal never calls
//!   the hasher.
//! - `CharSum` is order-insensitive: anagrams always collide. This is a
//!   property of the bucket function, not a bug in the map.
//!
//! Chains
//! - New keys are appended to the end of their chain.
//! - `set` on an existing key overwrites the value in place; the chain
//!   length and order are unchanged and outstanding handles stay valid.
//! - Removal deletes exactly one chain position and keeps the relative
//!   order of the rest.
//!
//! Absence and errors
//! - A missing key is not an error: `get` returns `None`, `remove`
//!   returns `false`.
//! - `insert`/`insert_with` refuse existing keys with
//!   `InsertError::DuplicateKey`.
//! - A zero bucket count, or a bucket count or capacity above
//!   `MAX_BUCKET_COUNT`/`MAX_CAPACITY`, is rejected with
//!   `ConfigError::Invalid` before anything is allocated.
//! - A `BucketHasher` that returns an out-of-range index panics at the
//!   call site instead of corrupting a chain.
//!
//! Threading
//! - No interior mutability and no locking. Mutation goes through
//!   `&mut self`; callers sharing a map between threads wrap it in a
//!   `Mutex`/`RwLock`.
//!
//! Logging
//! - Events are emitted through `tracing` under the `chain_hashmap`
//!   target: `debug` for construction and `clear`, `trace` for appends,
//!   overwrites and removals. No subscriber is installed here.

pub mod bucket_hasher;
pub mod chain_hash_map;
mod chain_hash_map_proptest;
pub mod config;

// Public surface
pub use bucket_hasher::{BucketHasher, CharSum};
pub use chain_hash_map::{ChainHashMap, Handle, InsertError, Iter, IterMut};
pub use config::{
    ConfigError, MapConfig, MapConfigBuilder, DEFAULT_BUCKET_COUNT, MAX_BUCKET_COUNT, MAX_CAPACITY,
};
