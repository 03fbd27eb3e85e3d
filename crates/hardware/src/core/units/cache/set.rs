//! Cache sets and blocks.
//!
//! A set is a fixed-length array of blocks, one per way, plus a count of the
//! valid ones. Replacement ranks live on the blocks themselves and are kept
//! consistent by the functions in [`replacement`](super::replacement).

/// A single cache block (line).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheBlock {
    /// Block address: the accessed address with its offset bits cleared.
    pub tag: u64,
    /// Whether the block holds a line.
    pub valid: bool,
    /// Stack-LRU position: 0 is most recently used.
    pub rank: usize,
}

/// One set of a set-associative cache.
#[derive(Clone, Debug)]
pub struct CacheSet {
    pub(crate) blocks: Vec<CacheBlock>,
    pub(crate) valid_count: usize,
}

impl CacheSet {
    /// Creates a set of `ways` invalid blocks.
    pub fn new(ways: usize) -> Self {
        Self {
            blocks: vec![CacheBlock::default(); ways],
            valid_count: 0,
        }
    }

    /// Rebuilds a set from explicit block contents, recounting the valid ones.
    ///
    /// Ranks are taken as given and are not checked.
    pub fn from_blocks(blocks: Vec<CacheBlock>) -> Self {
        let valid_count = blocks.iter().filter(|b| b.valid).count();
        Self {
            blocks,
            valid_count,
        }
    }

    /// Blocks of the set in way order.
    pub fn blocks(&self) -> &[CacheBlock] {
        &self.blocks
    }

    /// Number of valid blocks.
    pub const fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Associativity of the set.
    pub fn ways(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` when every way holds a valid block.
    pub fn is_full(&self) -> bool {
        self.valid_count == self.blocks.len()
    }

    /// Way holding a valid block with `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.valid && b.tag == tag)
    }

    /// Tags of the valid blocks ordered from most to least recently used.
    pub fn tags_by_recency(&self) -> Vec<u64> {
        let mut valid: Vec<&CacheBlock> = self.blocks.iter().filter(|b| b.valid).collect();
        valid.sort_by_key(|b| b.rank);
        valid.into_iter().map(|b| b.tag).collect()
    }

    /// Checks that the valid ranks are exactly `0..valid_count` and that
    /// `valid_count` matches the number of valid blocks.
    pub fn ranks_are_consistent(&self) -> bool {
        let mut seen = vec![false; self.valid_count];
        let mut valid = 0;
        for block in self.blocks.iter().filter(|b| b.valid) {
            valid += 1;
            match seen.get_mut(block.rank) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        valid == self.valid_count
    }
}
