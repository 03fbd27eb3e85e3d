//! Stack-LRU replacement state.
//!
//! Every valid block of a set carries a rank: 0 for the most recently used
//! block, `valid_count - 1` for the least recently used one. The operations in
//! this module are the only code that changes ranks, and each of them maps a
//! permutation of `0..valid_count` onto a permutation of `0..valid_count'`.
//!
//! | Event               | Ranks below the touched block | Touched block | Ranks above |
//! |---------------------|-------------------------------|---------------|-------------|
//! | hit at rank `r`     | `+1`                          | `0`           | unchanged   |
//! | fill into free way  | `+1` (all valid blocks)       | `0`           | n/a         |
//! | fill into full set  | `+1` (all blocks)             | LRU, now `0`  | n/a         |
//! | invalidate rank `r` | unchanged                     | cleared       | `-1`        |
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per operation, W = associativity
//! - **Space Complexity:** one rank per block, no side tables

use super::set::{CacheBlock, CacheSet};
use crate::common::{CacheLevel, ConsistencyError};

/// Block displaced by [`evict_and_insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Way that received the new block.
    pub way: usize,
    /// Tag held by that way before the replacement.
    pub tag: u64,
}

/// Rank bookkeeping failure, before the owning level and set are known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankFault {
    /// A full set did not hold exactly one block at the LRU rank.
    VictimCount(usize),
    /// No invalid way was found although the set is not full.
    NoFreeWay,
}

impl RankFault {
    /// Attaches the level and set the fault was found in.
    pub fn at(self, level: CacheLevel, set_index: usize, set: &CacheSet) -> ConsistencyError {
        match self {
            Self::VictimCount(candidates) => ConsistencyError::VictimCount {
                level,
                set: set_index,
                candidates,
            },
            Self::NoFreeWay => ConsistencyError::NoFreeWay {
                level,
                set: set_index,
                valid: set.valid_count(),
                ways: set.ways(),
            },
        }
    }
}

/// Makes the block at `hit_rank` the MRU block.
///
/// Blocks that were more recently used than it move one step towards LRU;
/// less recently used blocks keep their rank.
pub fn promote_on_hit(set: &mut CacheSet, hit_rank: usize) {
    for block in set.blocks.iter_mut().filter(|b| b.valid) {
        if block.rank < hit_rank {
            block.rank += 1;
        } else if block.rank == hit_rank {
            block.rank = 0;
        }
    }
}

/// Fills the lowest-indexed invalid way with `tag` as the MRU block.
///
/// Returns the way that was filled.
///
/// # Errors
///
/// Returns [`RankFault::NoFreeWay`] if every way is already valid.
pub fn insert_into_empty(set: &mut CacheSet, tag: u64) -> Result<usize, RankFault> {
    let way = set
        .blocks
        .iter()
        .position(|b| !b.valid)
        .ok_or(RankFault::NoFreeWay)?;

    for block in set.blocks.iter_mut().filter(|b| b.valid) {
        block.rank += 1;
    }
    set.blocks[way] = CacheBlock {
        tag,
        valid: true,
        rank: 0,
    };
    set.valid_count += 1;
    Ok(way)
}

/// Replaces the LRU block of a full set with `tag` as the MRU block.
///
/// # Errors
///
/// Returns [`RankFault::VictimCount`] unless exactly one block holds rank
/// `ways - 1`. The set is left untouched in that case.
pub fn evict_and_insert(set: &mut CacheSet, tag: u64) -> Result<Eviction, RankFault> {
    let lru_rank = set.blocks.len().saturating_sub(1);
    let mut candidates = set
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.rank == lru_rank);
    let way = match (candidates.next(), candidates.next()) {
        (Some((way, _)), None) => way,
        _ => {
            let count = set.blocks.iter().filter(|b| b.rank == lru_rank).count();
            return Err(RankFault::VictimCount(count));
        }
    };

    for block in &mut set.blocks {
        block.rank += 1;
    }
    let victim = &mut set.blocks[way];
    let evicted = victim.tag;
    victim.tag = tag;
    victim.rank = 0;
    Ok(Eviction { way, tag: evicted })
}

/// Invalidates the block in `way` and closes the gap it leaves in the ranks.
///
/// Does nothing if the way is already invalid.
pub fn release(set: &mut CacheSet, way: usize) {
    let Some(block) = set.blocks.get_mut(way) else {
        return;
    };
    if !block.valid {
        return;
    }
    let freed = block.rank;
    block.valid = false;
    block.rank = 0;

    for other in set.blocks.iter_mut().filter(|b| b.valid) {
        if other.rank > freed {
            other.rank -= 1;
        }
    }
    set.valid_count -= 1;
}
