//! Configuration for the cache hierarchy.
//!
//! This module defines the configuration record consumed by [`Hierarchy::new`](crate::core::Hierarchy::new).
//! It provides:
//! 1. **Defaults:** Baseline block size, memory latency and per-level geometry.
//! 2. **Structures:** A per-level [`CacheConfig`] and the top-level [`Config`].
//! 3. **Parsing:** JSON loading and the `sets:assoc:hit` shorthand used on the command line.
//! 4. **Validation:** Power-of-two and associativity checks, run once before any access.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{CacheLevel, ConfigError, block_offset_bits, set_index_bits};

/// Default configuration constants.
mod defaults {
    /// Default block (line) size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Default main-memory latency in cycles.
    pub const MEMORY_LATENCY: u64 = 100;

    /// Default set count; zero leaves the level disabled.
    pub const CACHE_SETS: usize = 0;

    /// Default associativity (direct-mapped).
    pub const CACHE_WAYS: usize = 1;

    /// Default hit latency in cycles.
    pub const CACHE_LATENCY: u64 = 1;
}

/// Geometry and timing of a single cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Number of sets; zero disables the level.
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (blocks per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Hit latency in cycles.
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,
}

impl CacheConfig {
    /// Creates a level configuration from its geometry and hit latency.
    pub const fn new(sets: usize, ways: usize, latency: u64) -> Self {
        Self {
            sets,
            ways,
            latency,
        }
    }

    /// A level with zero sets; accesses bypass it.
    pub const fn disabled() -> Self {
        Self::new(0, defaults::CACHE_WAYS, defaults::CACHE_LATENCY)
    }

    /// Returns `true` when the level takes part in lookups.
    pub const fn is_enabled(&self) -> bool {
        self.sets != 0
    }

    /// Checks the geometry of this level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SetCount`] for a non-zero, non-power-of-two set
    /// count and [`ConfigError::Associativity`] for an enabled level with no ways.
    pub fn validate(&self, level: CacheLevel) -> Result<(), ConfigError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let _ = set_index_bits(level, self.sets)?;
        if self.ways == 0 {
            return Err(ConfigError::Associativity {
                level,
                sets: self.sets,
            });
        }
        Ok(())
    }

    fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_latency() -> u64 {
        defaults::CACHE_LATENCY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl FromStr for CacheConfig {
    type Err = ConfigError;

    /// Parses `sets:assoc:hit`, e.g. `256:4:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let geometry = || ConfigError::Geometry(s.to_owned());
        let mut fields = s.trim().split(':').map(str::trim);
        let mut next = || fields.next().ok_or_else(geometry);

        let sets = next()?.parse::<usize>().map_err(|_| geometry())?;
        let ways = next()?.parse::<usize>().map_err(|_| geometry())?;
        let latency = next()?.parse::<u64>().map_err(|_| geometry())?;
        if fields.next().is_some() {
            return Err(geometry());
        }
        Ok(Self::new(sets, ways, latency))
    }
}

/// Root configuration of a simulated hierarchy.
///
/// Every field is optional in JSON; omitted levels are disabled.
///
/// ```json
/// {
///   "l1_i": { "sets": 128, "ways": 2, "latency": 1 },
///   "l1_d": { "sets": 128, "ways": 4, "latency": 1 },
///   "l2":   { "sets": 1024, "ways": 8, "latency": 10 },
///   "inclusive": true,
///   "block_size": 64,
///   "memory_latency": 100
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// L1 instruction cache.
    #[serde(default)]
    pub l1_i: CacheConfig,

    /// L1 data cache.
    #[serde(default)]
    pub l1_d: CacheConfig,

    /// Shared L2 cache.
    #[serde(default)]
    pub l2: CacheConfig,

    /// Back-invalidate L1 copies when the L2 evicts a block.
    #[serde(default)]
    pub inclusive: bool,

    /// Block size in bytes, shared by every level.
    #[serde(default = "Config::default_block_size")]
    pub block_size: u64,

    /// Main-memory latency in cycles.
    #[serde(default = "Config::default_memory_latency")]
    pub memory_latency: u64,
}

impl Config {
    /// Decodes a configuration from a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, or any error reported
    /// by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks block size and every level's geometry.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking the block size first
    /// and then L1-I, L1-D and L2 in that order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = block_offset_bits(self.block_size)?;
        for (level, cache) in self.levels() {
            cache.validate(level)?;
        }
        Ok(())
    }

    /// Level configurations paired with their identifiers, L1-I first.
    pub const fn levels(&self) -> [(CacheLevel, &CacheConfig); 3] {
        [
            (CacheLevel::L1I, &self.l1_i),
            (CacheLevel::L1D, &self.l1_d),
            (CacheLevel::L2, &self.l2),
        ]
    }

    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    fn default_memory_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for Config {
    /// All levels disabled: every access costs one memory latency.
    fn default() -> Self {
        Self {
            l1_i: CacheConfig::default(),
            l1_d: CacheConfig::default(),
            l2: CacheConfig::default(),
            inclusive: false,
            block_size: defaults::BLOCK_SIZE,
            memory_latency: defaults::MEMORY_LATENCY,
        }
    }
}
