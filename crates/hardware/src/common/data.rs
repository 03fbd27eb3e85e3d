//! Access and Level Classification.
//!
//! This module defines the two small enums that route work through the hierarchy:
//! 1. **Access Kind:** Whether a trace record is an instruction fetch or a data access.
//! 2. **Cache Level:** Which of the three cache levels an event, error or counter belongs to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of memory access carried by a trace record.
///
/// Instruction accesses are served by the L1 instruction cache, data accesses
/// (loads and stores alike) by the L1 data cache. Both share the L2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Instruction fetch, routed to the L1-I cache.
    Instruction,
    /// Data load or store, routed to the L1-D cache.
    Data,
}

impl AccessKind {
    /// Parses the single-letter trace mnemonic (`i`/`I` or `d`/`D`).
    pub fn from_mnemonic(token: &str) -> Option<Self> {
        match token {
            "i" | "I" => Some(Self::Instruction),
            "d" | "D" => Some(Self::Data),
            _ => None,
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction => write!(f, "instruction"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// One level of the simulated hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CacheLevel {
    /// Split L1 instruction cache (I$).
    L1I,
    /// Split L1 data cache (D$).
    L1D,
    /// Shared second-level cache.
    L2,
}

impl CacheLevel {
    /// Short label used in reports and log events.
    pub const fn label(self) -> &'static str {
        match self {
            Self::L1I => "L1-I",
            Self::L1D => "L1-D",
            Self::L2 => "L2",
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
