//! Construction parameters for `ChainHashMap`.

use core::fmt;
use core::num::NonZeroUsize;

/// Bucket count used by `ChainHashMap::new` and `MapConfig::default`.
pub const DEFAULT_BUCKET_COUNT: usize = 42;

/// Largest accepted bucket count. Every bucket is allocated up front.
pub const MAX_BUCKET_COUNT: usize = 1 << 24;

/// Largest accepted entry reservation. Well under slotmap's `u32` slot limit.
pub const MAX_CAPACITY: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    /// Number of chains. Fixed for the life of the map.
    pub bucket_count: usize,
    /// Entries to reserve up front in the slot storage.
    pub capacity: usize,
}

impl MapConfig {
    pub fn builder() -> MapConfigBuilder {
        MapConfigBuilder::new()
    }

    pub(crate) fn validate(&self) -> Result<NonZeroUsize, ConfigError> {
        let bucket_count = NonZeroUsize::new(self.bucket_count)
            .ok_or(ConfigError::Invalid("bucket_count must be greater than zero"))?;
        if bucket_count.get() > MAX_BUCKET_COUNT {
            return Err(ConfigError::Invalid(
                "bucket_count must not exceed MAX_BUCKET_COUNT",
            ));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid("capacity must not exceed MAX_CAPACITY"));
        }
        Ok(bucket_count)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            capacity: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    inner: MapConfig,
}

impl MapConfigBuilder {
    pub fn new() -> Self {
        Self {
            inner: MapConfig::default(),
        }
    }

    pub fn bucket_count(mut self, count: usize) -> Self {
        self.inner.bucket_count = count;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.inner.capacity = capacity;
        self
    }

    pub fn build(self) -> Result<MapConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(reason) => write!(f, "invalid map configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
