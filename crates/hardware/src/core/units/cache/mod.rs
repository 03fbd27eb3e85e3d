//! Set-Associative Cache.
//!
//! This module implements a single level of the hierarchy (L1-I, L1-D or L2).
//! A level is an array of [`CacheSet`]s addressed by the set-index bits of the
//! block address, with stack-LRU replacement inside each set. A level built
//! with zero sets is disabled: every access reports [`AccessOutcome::Disabled`]
//! so the caller can route straight to the next level.
//!
//! Levels hold no reference to each other. Cross-level effects such as inclusive
//! back-invalidation are driven by the [`Hierarchy`](crate::core::Hierarchy)
//! through [`Cache::invalidate`].

/// Stack-LRU rank bookkeeping.
pub mod replacement;

/// Set and block storage.
pub mod set;

use tracing::{debug, trace};

use self::replacement::{Eviction, evict_and_insert, insert_into_empty, promote_on_hit, release};
use self::set::CacheSet;
use crate::common::{CacheLevel, ConfigError, ConsistencyError, block_tag, set_index};
use crate::config::CacheConfig;
use crate::stats::LevelStats;

/// Result of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The level is disabled; no counter was touched.
    Disabled,
    /// The block was resident.
    Hit,
    /// The block was filled; `evicted` holds the displaced tag when the set was full.
    Miss {
        /// Tag of the block replaced by the fill.
        evicted: Option<u64>,
    },
}

impl AccessOutcome {
    /// Returns `true` for [`AccessOutcome::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// One level of the cache hierarchy.
#[derive(Debug)]
pub struct Cache {
    level: CacheLevel,
    sets: Vec<CacheSet>,
    ways: usize,
    hit_latency: u64,
    offset_bits: u32,
    stats: LevelStats,
}

impl Cache {
    /// Builds a level from its configuration and the hierarchy's block-offset width.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the set count is neither zero nor a power
    /// of two, or if an enabled level has no ways.
    pub fn new(level: CacheLevel, config: &CacheConfig, offset_bits: u32) -> Result<Self, ConfigError> {
        config.validate(level)?;
        let sets = if config.is_enabled() {
            (0..config.sets).map(|_| CacheSet::new(config.ways)).collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            level,
            sets,
            ways: config.ways,
            hit_latency: config.latency,
            offset_bits,
            stats: LevelStats::default(),
        })
    }

    /// Looks up `addr`, updating replacement state and counters.
    ///
    /// On a miss the block is always filled, into a free way if the set has
    /// one and over the LRU block otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsistencyError`] if the set's ranks no longer form a
    /// permutation; the set is not modified in that case.
    pub fn access(&mut self, addr: u64) -> Result<AccessOutcome, ConsistencyError> {
        if !self.is_enabled() {
            return Ok(AccessOutcome::Disabled);
        }
        self.stats.refs = self.stats.refs.saturating_add(1);

        let index = set_index(addr, self.offset_bits, self.sets.len());
        let tag = block_tag(addr, self.offset_bits);
        let level = self.level;
        let set = &mut self.sets[index];

        if let Some(way) = set.find(tag) {
            let rank = set.blocks[way].rank;
            promote_on_hit(set, rank);
            trace!(%level, addr, set = index, way, "hit");
            return Ok(AccessOutcome::Hit);
        }

        self.stats.misses = self.stats.misses.saturating_add(1);
        if set.is_full() {
            let Eviction { way, tag: evicted } =
                evict_and_insert(set, tag).map_err(|fault| fault.at(level, index, set))?;
            debug!(%level, set = index, way, evicted, filled = tag, "evict");
            Ok(AccessOutcome::Miss {
                evicted: Some(evicted),
            })
        } else {
            let way = insert_into_empty(set, tag).map_err(|fault| fault.at(level, index, set))?;
            trace!(%level, set = index, way, filled = tag, "fill");
            Ok(AccessOutcome::Miss { evicted: None })
        }
    }

    /// Drops the block with `tag` if this level holds it.
    ///
    /// Only the set that `tag` maps to under this level's own geometry is
    /// searched. Returns `true` if a block was invalidated. Counters are not
    /// touched.
    pub fn invalidate(&mut self, tag: u64) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let index = set_index(tag, self.offset_bits, self.sets.len());
        let set = &mut self.sets[index];
        match set.find(tag) {
            Some(way) => {
                release(set, way);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the block containing `addr` is resident.
    ///
    /// Side-effect free: neither ranks nor counters change.
    pub fn contains(&self, addr: u64) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let index = set_index(addr, self.offset_bits, self.sets.len());
        self.sets[index]
            .find(block_tag(addr, self.offset_bits))
            .is_some()
    }

    /// Adds miss-penalty cycles attributed to this level, saturating at `u64::MAX`.
    pub const fn add_penalty(&mut self, cycles: u64) {
        self.stats.penalties = self.stats.penalties.saturating_add(cycles);
    }

    /// Returns `false` for a level configured with zero sets.
    pub fn is_enabled(&self) -> bool {
        !self.sets.is_empty()
    }

    /// Level this cache models.
    pub const fn level(&self) -> CacheLevel {
        self.level
    }

    /// Hit latency in cycles.
    pub const fn hit_latency(&self) -> u64 {
        self.hit_latency
    }

    /// Number of sets (zero when disabled).
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Set at `index`, if it exists.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    #[cfg(test)]
    pub(crate) fn set_mut(&mut self, index: usize) -> Option<&mut CacheSet> {
        self.sets.get_mut(index)
    }

    /// Index of the set `addr` maps to, or `None` when disabled.
    pub fn set_index_of(&self, addr: u64) -> Option<usize> {
        self.is_enabled()
            .then(|| set_index(addr, self.offset_bits, self.sets.len()))
    }

    /// Snapshot of this level's counters.
    pub const fn stats(&self) -> LevelStats {
        self.stats
    }
}
