//! Cache hierarchy controller.
//!
//! Owns the split L1 caches and the shared L2 and runs one access at a time to
//! completion:
//!
//! ```text
//!   instruction ──► L1-I ─┐
//!                         ├─ miss ──► L2 ── miss ──► memory
//!   data ─────────► L1-D ─┘             │
//!                                       └─ evict T (inclusive) ──► invalidate T in L1-I, L1-D
//! ```
//!
//! A disabled level is skipped without touching its counters. Inclusion is only
//! enforced when the L2 evicts; an L1 fill never checks the L2.
//!
//! Latencies and counters saturate at `u64::MAX` instead of wrapping.

use tracing::{debug, info, trace};

use crate::common::{AccessKind, CacheLevel, ConfigError, ConsistencyError, block_offset_bits, block_tag};
use crate::config::Config;
use crate::core::units::cache::{AccessOutcome, Cache};
use crate::stats::HierarchyStats;

/// Two-level cache hierarchy: split L1-I/L1-D over a shared, optionally inclusive L2.
#[derive(Debug)]
pub struct Hierarchy {
    icache: Cache,
    dcache: Cache,
    l2: Cache,
    offset_bits: u32,
    memory_latency: u64,
    inclusive: bool,
}

impl Hierarchy {
    /// Validates `config` and allocates every level.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a block size or set count that is not a
    /// power of two, or an enabled level with zero ways.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let offset_bits = block_offset_bits(config.block_size)?;

        let hierarchy = Self {
            icache: Cache::new(CacheLevel::L1I, &config.l1_i, offset_bits)?,
            dcache: Cache::new(CacheLevel::L1D, &config.l1_d, offset_bits)?,
            l2: Cache::new(CacheLevel::L2, &config.l2, offset_bits)?,
            offset_bits,
            memory_latency: config.memory_latency,
            inclusive: config.inclusive,
        };
        info!(
            l1_i = ?config.l1_i,
            l1_d = ?config.l1_d,
            l2 = ?config.l2,
            block_size = config.block_size,
            memory_latency = config.memory_latency,
            inclusive = config.inclusive,
            "cache hierarchy initialized"
        );
        Ok(hierarchy)
    }

    /// Runs one access through the hierarchy and returns its latency in cycles.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsistencyError`] if any level's replacement state is found
    /// corrupted. The run should be aborted; counters are no longer meaningful.
    pub fn access(&mut self, kind: AccessKind, addr: u64) -> Result<u64, ConsistencyError> {
        let latency = self.l1_access(kind, addr)?;
        trace!(%kind, addr, latency, "access");
        Ok(latency)
    }

    /// Shorthand for an [`AccessKind::Instruction`] access.
    ///
    /// # Errors
    ///
    /// See [`Hierarchy::access`].
    pub fn icache_access(&mut self, addr: u64) -> Result<u64, ConsistencyError> {
        self.access(AccessKind::Instruction, addr)
    }

    /// Shorthand for an [`AccessKind::Data`] access.
    ///
    /// # Errors
    ///
    /// See [`Hierarchy::access`].
    pub fn dcache_access(&mut self, addr: u64) -> Result<u64, ConsistencyError> {
        self.access(AccessKind::Data, addr)
    }

    /// Read-only snapshot of every level's counters.
    pub const fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            l1_i: self.icache.stats(),
            l1_d: self.dcache.stats(),
            l2: self.l2.stats(),
        }
    }

    /// The cache modelling `level`.
    pub const fn cache(&self, level: CacheLevel) -> &Cache {
        match level {
            CacheLevel::L1I => &self.icache,
            CacheLevel::L1D => &self.dcache,
            CacheLevel::L2 => &self.l2,
        }
    }

    /// Main-memory latency in cycles.
    pub const fn memory_latency(&self) -> u64 {
        self.memory_latency
    }

    /// Whether L2 evictions back-invalidate the L1 caches.
    pub const fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    #[cfg(test)]
    pub(crate) const fn cache_mut(&mut self, level: CacheLevel) -> &mut Cache {
        match level {
            CacheLevel::L1I => &mut self.icache,
            CacheLevel::L1D => &mut self.dcache,
            CacheLevel::L2 => &mut self.l2,
        }
    }

    const fn l1_mut(&mut self, kind: AccessKind) -> &mut Cache {
        match kind {
            AccessKind::Instruction => &mut self.icache,
            AccessKind::Data => &mut self.dcache,
        }
    }

    fn l1_access(&mut self, kind: AccessKind, addr: u64) -> Result<u64, ConsistencyError> {
        let block_addr = block_tag(addr, self.offset_bits);
        match self.l1_mut(kind).access(addr)? {
            AccessOutcome::Disabled => self.l2_access(block_addr),
            AccessOutcome::Hit => Ok(self.l1_mut(kind).hit_latency()),
            AccessOutcome::Miss { .. } => {
                let penalty = self.l2_access(block_addr)?;
                let l1 = self.l1_mut(kind);
                l1.add_penalty(penalty);
                Ok(l1.hit_latency().saturating_add(penalty))
            }
        }
    }

    fn l2_access(&mut self, block_addr: u64) -> Result<u64, ConsistencyError> {
        match self.l2.access(block_addr)? {
            AccessOutcome::Disabled => Ok(self.memory_latency),
            AccessOutcome::Hit => Ok(self.l2.hit_latency()),
            AccessOutcome::Miss { evicted } => {
                self.l2.add_penalty(self.memory_latency);
                if let Some(tag) = evicted.filter(|_| self.inclusive) {
                    self.back_invalidate(tag);
                }
                Ok(self.l2.hit_latency().saturating_add(self.memory_latency))
            }
        }
    }

    /// Removes every L1 copy of a block the L2 just evicted.
    fn back_invalidate(&mut self, tag: u64) {
        for l1 in [&mut self.icache, &mut self.dcache] {
            if l1.invalidate(tag) {
                debug!(level = %l1.level(), tag, "back-invalidated");
            }
        }
    }
}
