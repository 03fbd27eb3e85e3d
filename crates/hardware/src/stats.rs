//! Cache statistics collection and reporting.
//!
//! This module tracks the per-level counters of a simulation run. It provides:
//! 1. **Counters:** References, misses and miss-penalty cycles for each level.
//! 2. **Snapshots:** A copy of all three levels taken at any point of the run.
//! 3. **Derived metrics:** Miss rate and average miss penalty.
//! 4. **Reporting:** A fixed-width text table and `serde` serialization.

use std::fmt;

use serde::Serialize;

use crate::common::CacheLevel;

/// Counters for one cache level.
///
/// Only the cache access paths mutate these; callers receive copies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Accesses that reached this level while it was enabled.
    pub refs: u64,
    /// Accesses that missed.
    pub misses: u64,
    /// Cycles spent below this level servicing its misses.
    pub penalties: u64,
}

impl LevelStats {
    /// Accesses that hit.
    pub const fn hits(&self) -> u64 {
        self.refs.saturating_sub(self.misses)
    }

    /// Fraction of references that missed, 0 when there were none.
    pub fn miss_rate(&self) -> f64 {
        if self.refs == 0 {
            0.0
        } else {
            self.misses as f64 / self.refs as f64
        }
    }

    /// Mean penalty per miss in cycles, 0 when there were no misses.
    pub fn avg_miss_penalty(&self) -> f64 {
        if self.misses == 0 {
            0.0
        } else {
            self.penalties as f64 / self.misses as f64
        }
    }
}

/// Snapshot of every level's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// L1 instruction cache.
    pub l1_i: LevelStats,
    /// L1 data cache.
    pub l1_d: LevelStats,
    /// Shared L2 cache.
    pub l2: LevelStats,
}

impl HierarchyStats {
    /// Counters of `level`.
    pub const fn level(&self, level: CacheLevel) -> &LevelStats {
        match level {
            CacheLevel::L1I => &self.l1_i,
            CacheLevel::L1D => &self.l1_d,
            CacheLevel::L2 => &self.l2,
        }
    }

    /// Prints the report table to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for HierarchyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "CACHE HIERARCHY STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(
            f,
            "  {:<6} {:>12} {:>12} {:>10} {:>14}",
            "level", "refs", "misses", "miss_rate", "avg_penalty"
        )?;
        for level in [CacheLevel::L1I, CacheLevel::L1D, CacheLevel::L2] {
            let s = self.level(level);
            writeln!(
                f,
                "  {:<6} {:>12} {:>12} {:>9.2}% {:>14.2}",
                level.label(),
                s.refs,
                s.misses,
                s.miss_rate() * 100.0,
                s.avg_miss_penalty()
            )?;
        }
        writeln!(f, "==========================================================")
    }
}
