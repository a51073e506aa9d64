/// Descriptor for a contiguous byte range inside the pool.
///
/// Blocks never carry a pointer of their own: the `offset` is always
/// relative to the start of the pool, so descriptors stay valid no matter
/// where the operating system decided to map the backing page.
///
/// ```text
/// Pool (P bytes)
/// +-----------+-------------------+--------------------------+
/// | allocated |     allocated     |           free           |
/// +-----------+-------------------+--------------------------+
/// ^
/// offset 0    every range is an (offset, size) pair
/// ```
///
/// The invariant `offset + size <= P` holds for every descriptor the
/// allocator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Offset from the beginning of the pool.
    pub offset: usize,
    /// Size of the block in bytes.
    pub size: usize,
}

impl Block {
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// First byte past the end of this block.
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Whether `other` starts exactly where this block ends. Two such
    /// blocks can be coalesced into one.
    #[inline]
    pub const fn is_adjacent_to(&self, other: &Block) -> bool {
        self.end() == other.offset
    }
}
