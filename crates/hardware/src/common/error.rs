//! Error definitions.
//!
//! The simulator distinguishes two failure classes:
//! 1. **Configuration errors:** Rejected geometry or malformed configuration input.
//!    Raised once, while building the hierarchy, and never during an access.
//! 2. **Consistency errors:** The LRU rank bookkeeping of a set was found broken.
//!    These indicate a simulator bug; the run must stop rather than keep
//!    producing statistics from a corrupted replacement state.

use thiserror::Error;

use super::data::CacheLevel;

/// Rejected hierarchy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Block size is zero or not a power of two.
    #[error("block size {0} must be a non-zero power of two")]
    BlockSize(u64),

    /// Set count of an enabled level is not a power of two.
    #[error("{level} set count {sets} must be zero (disabled) or a power of two")]
    SetCount {
        /// Level whose geometry was rejected.
        level: CacheLevel,
        /// Offending set count.
        sets: usize,
    },

    /// An enabled level was configured with zero ways.
    #[error("{level} has {sets} sets but zero associativity")]
    Associativity {
        /// Level whose geometry was rejected.
        level: CacheLevel,
        /// Set count the level was enabled with.
        sets: usize,
    },

    /// A `sets:assoc:hit` geometry string could not be parsed.
    #[error("invalid cache geometry `{0}`, expected `sets:assoc:hit`")]
    Geometry(String),

    /// The JSON configuration document could not be decoded.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broken LRU rank invariant detected while replacing a block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A full set did not contain exactly one block at the LRU rank.
    #[error("{level} set {set}: expected exactly one LRU victim, found {candidates}")]
    VictimCount {
        /// Level owning the corrupted set.
        level: CacheLevel,
        /// Index of the corrupted set.
        set: usize,
        /// Number of blocks that held the LRU rank.
        candidates: usize,
    },

    /// An insertion was attempted into a set with no invalid slot.
    #[error("{level} set {set}: no free way although {valid} of {ways} ways are valid")]
    NoFreeWay {
        /// Level owning the corrupted set.
        level: CacheLevel,
        /// Index of the corrupted set.
        set: usize,
        /// Recorded valid-block count.
        valid: usize,
        /// Associativity of the set.
        ways: usize,
    },
}
