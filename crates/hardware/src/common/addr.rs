//! Address decomposition.
//!
//! Maps a raw 64-bit address onto the block tag and set index used by a cache level.
//! Geometry is restricted to powers of two so every split is a shift and a mask:
//!
//! ```text
//!  63                                  offset_bits      0
//! +-------------------------------------+----------------+
//! |          block tag (incl. set)      |  block offset  |
//! +-------------------------------------+----------------+
//!                     |<-- set bits -->|
//! ```
//!
//! The tag keeps the set-index bits, so two blocks compare equal exactly when
//! their full block addresses do, independent of the cache they live in.

use super::data::CacheLevel;
use super::error::ConfigError;

/// Returns `log2(value)` when `value` is a non-zero power of two.
const fn exact_log2(value: u64) -> Option<u32> {
    if value.is_power_of_two() {
        Some(value.trailing_zeros())
    } else {
        None
    }
}

/// Number of block-offset bits for `block_size`.
///
/// # Errors
///
/// Returns [`ConfigError::BlockSize`] if `block_size` is zero or not a power of two.
pub fn block_offset_bits(block_size: u64) -> Result<u32, ConfigError> {
    exact_log2(block_size).ok_or(ConfigError::BlockSize(block_size))
}

/// Number of set-index bits for a level with `num_sets` sets.
///
/// A set count of zero means the level is disabled; callers handle that case
/// before asking for the index width.
///
/// # Errors
///
/// Returns [`ConfigError::SetCount`] if `num_sets` is zero or not a power of two.
pub fn set_index_bits(level: CacheLevel, num_sets: usize) -> Result<u32, ConfigError> {
    exact_log2(num_sets as u64).ok_or(ConfigError::SetCount {
        level,
        sets: num_sets,
    })
}

/// Set selected by `addr` in a cache of `num_sets` sets.
///
/// `num_sets` must be a non-zero power of two.
#[inline(always)]
pub const fn set_index(addr: u64, offset_bits: u32, num_sets: usize) -> usize {
    ((addr >> offset_bits) & (num_sets as u64 - 1)) as usize
}

/// `addr` with its block-offset bits cleared.
#[inline(always)]
pub const fn block_tag(addr: u64, offset_bits: u32) -> u64 {
    addr & (u64::MAX << offset_bits)
}
