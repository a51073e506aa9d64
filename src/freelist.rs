use crate::block::Block;

/// Ordered set of free [`Block`] descriptors.
///
/// The list is kept sorted ascending by offset at all times, which is what
/// makes both the first-fit scan and the coalescing pass a single sweep:
///
/// ```text
///   offset:   0        192         1024            3072
///             +--------+           +---------------+
///   free:     | {0,64} |   ....    |  {1024, 512}  |   ....
///             +--------+           +---------------+
///
///   After any mutation no two entries overlap and no two entries touch;
///   adjacent entries are merged immediately.
/// ```
///
/// The list is bounded by `max_blocks`. Callers check [`FreeList::is_full`]
/// before inserting so a full list rejects the operation instead of
/// corrupting its neighbours.
pub(crate) struct FreeList {
    blocks: Vec<Block>,
    max_blocks: usize,
}

impl FreeList {
    pub fn new(max_blocks: usize) -> Self {
        Self {
            blocks: Vec::new(),
            max_blocks,
        }
    }

    /// Seeds the list with a single block covering the whole pool.
    pub fn reset(&mut self, pool_size: usize) {
        self.blocks.clear();
        self.blocks.push(Block::new(0, pool_size));
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.blocks.len() == self.max_blocks
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Removes `size` bytes from the first free block big enough to hold
    /// them and returns the carved-out range (first-fit policy).
    ///
    /// An exact fit removes the whole block from the list. A larger block
    /// is split: the low part is handed out and the remainder keeps the
    /// high part, so the block's offset advances by `size` and its size
    /// shrinks by the same amount.
    pub fn take_first_fit(&mut self, size: usize) -> Option<Block> {
        let index = self.blocks.iter().position(|block| block.size >= size)?;

        let taken = Block::new(self.blocks[index].offset, size);

        if self.blocks[index].size == size {
            self.blocks.remove(index);
        } else {
            self.blocks[index].offset += size;
            self.blocks[index].size -= size;
        }

        Some(taken)
    }

    /// Inserts a freed block and merges it with any adjacent neighbours.
    ///
    /// The block is appended, the list is re-sorted by offset, and a single
    /// left-to-right pass folds every touching pair into one entry. The
    /// index is only advanced when nothing was merged, so a chain of three
    /// or more mutually adjacent blocks collapses into a single entry in
    /// one call.
    ///
    /// Callers must have checked [`FreeList::is_full`] first.
    pub fn insert(&mut self, block: Block) {
        debug_assert!(!self.is_full());

        self.blocks.push(block);
        self.blocks.sort_by_key(|block| block.offset);

        let mut i = 0;
        while i + 1 < self.blocks.len() {
            if self.blocks[i].is_adjacent_to(&self.blocks[i + 1]) {
                self.blocks[i].size += self.blocks[i + 1].size;
                self.blocks.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(blocks: &[(usize, usize)]) -> FreeList {
        let mut list = FreeList::new(512);
        for &(offset, size) in blocks {
            list.insert(Block::new(offset, size));
        }
        list
    }

    #[test]
    fn reset_seeds_single_block() {
        let mut list = FreeList::new(512);
        list.reset(4096);

        assert_eq!(list.blocks(), &[Block::new(0, 4096)]);
    }

    #[test]
    fn insert_keeps_blocks_sorted() {
        let list = list_with(&[(256, 64), (0, 64), (1024, 64)]);

        assert_eq!(
            list.blocks(),
            &[Block::new(0, 64), Block::new(256, 64), Block::new(1024, 64)]
        );
    }

    #[test]
    fn insert_merges_with_lower_neighbour() {
        let mut list = list_with(&[(0, 128)]);
        list.insert(Block::new(128, 64));

        assert_eq!(list.blocks(), &[Block::new(0, 192)]);
    }

    #[test]
    fn insert_merges_with_upper_neighbour() {
        let mut list = list_with(&[(128, 64)]);
        list.insert(Block::new(0, 128));

        assert_eq!(list.blocks(), &[Block::new(0, 192)]);
    }

    #[test]
    fn insert_merges_with_both_neighbours() {
        let mut list = list_with(&[(0, 64), (128, 64)]);
        list.insert(Block::new(64, 64));

        assert_eq!(list.blocks(), &[Block::new(0, 192)]);
    }

    #[test]
    fn chain_collapses_regardless_of_free_order() {
        // Three adjacent equal-size blocks freed in different orders must
        // always end as one spanning block.
        for order in [[64usize, 0, 128], [0, 128, 64]] {
            let mut list = FreeList::new(512);
            for offset in order {
                list.insert(Block::new(offset, 64));
            }

            assert_eq!(list.blocks(), &[Block::new(0, 192)]);
        }
    }

    #[test]
    fn first_fit_picks_lowest_adequate_offset() {
        // The block at offset 0 is too small; the scan must land on the
        // one at 256 even though 1024 would also fit.
        let mut list = list_with(&[(0, 64), (256, 256), (1024, 512)]);

        let taken = list.take_first_fit(128).unwrap();

        assert_eq!(taken, Block::new(256, 128));
    }

    #[test]
    fn exact_fit_removes_the_block() {
        let mut list = list_with(&[(0, 64), (256, 128)]);

        let taken = list.take_first_fit(128).unwrap();

        assert_eq!(taken, Block::new(256, 128));
        assert_eq!(list.blocks(), &[Block::new(0, 64)]);
    }

    #[test]
    fn split_leaves_the_high_remainder_free() {
        let mut list = list_with(&[(256, 256)]);

        let taken = list.take_first_fit(64).unwrap();

        assert_eq!(taken, Block::new(256, 64));

        let remaining = list.blocks()[0];
        assert_eq!(remaining.offset, 256 + 64);
        assert_eq!(remaining.size, 256 - 64);
        assert!(remaining.size > 0);
    }

    #[test]
    fn take_fails_when_nothing_fits() {
        let mut list = list_with(&[(0, 64), (256, 64)]);

        assert!(list.take_first_fit(128).is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn capacity_is_tracked() {
        let mut list = FreeList::new(2);
        list.insert(Block::new(0, 64));
        assert!(!list.is_full());

        // Not adjacent, so the list grows to its cap.
        list.insert(Block::new(256, 64));
        assert!(list.is_full());
    }
}
