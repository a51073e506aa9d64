use std::ptr::NonNull;

use log::{info, trace};

use crate::{block::Block, error::Error, freelist::FreeList, kernel};

/// Default minimum allocation granularity in bytes.
pub const DEFAULT_GRANULARITY: usize = 64;

/// Default maximum number of tracked blocks per list.
pub const DEFAULT_MAX_BLOCKS: usize = 512;

/// Configuration of a [`PagePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Total pool size P in bytes. Defaults to one OS page.
    pub size: usize,
    /// Minimum allocation granularity G. Every request must be a positive
    /// multiple of this.
    pub granularity: usize,
    /// Maximum number of blocks tracked per list (free and allocated).
    pub max_blocks: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: kernel::page_size(),
            granularity: DEFAULT_GRANULARITY,
            max_blocks: DEFAULT_MAX_BLOCKS,
        }
    }
}

impl PoolConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.granularity == 0 {
            return Err(Error::InvalidConfig("granularity must be nonzero"));
        }
        if self.size == 0 || self.size % self.granularity != 0 {
            return Err(Error::InvalidConfig(
                "pool size must be a positive multiple of the granularity",
            ));
        }
        if self.max_blocks == 0 {
            return Err(Error::InvalidConfig("max_blocks must be nonzero"));
        }

        Ok(())
    }
}

/// A fixed-capacity arena allocator over a single OS-backed memory region.
///
/// The pool owns one contiguous mapping of `config.size` bytes and serves
/// sub-allocations out of it. Two block lists account for every byte:
///
/// ```text
///              +--------------------------------------------+
///    pool:     | A0  |  A1   |        free        | A2 | f  |
///              +--------------------------------------------+
///
///    allocated: {0,64} {64,128} {..} ...        (unordered)
///    free:      {192, 3776} {4032, 64}          (sorted by offset)
/// ```
///
/// At every point between `init` and `cleanup` the two lists are disjoint
/// and together cover exactly `[0, P)`.
///
/// The pool is a plain value: create as many independent instances as you
/// need. It is not thread-safe; wrap it in a mutex if several threads must
/// share one.
pub struct PagePool {
    /// Start of the mapping, `None` while uninitialized.
    base: Option<NonNull<u8>>,
    config: PoolConfig,
    free: FreeList,
    allocated: Vec<Block>,
}

impl PagePool {
    /// Creates an uninitialized pool with the default configuration. No
    /// memory is requested from the OS until [`PagePool::init`].
    pub fn new() -> Self {
        // The default config is always valid.
        Self::with_config(PoolConfig::default()).unwrap()
    }

    /// Creates an uninitialized pool with a custom configuration.
    pub fn with_config(config: PoolConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            base: None,
            free: FreeList::new(config.max_blocks),
            allocated: Vec::new(),
            config,
        })
    }

    /// Maps the backing memory and makes the whole pool available as one
    /// free block.
    ///
    /// Fails with [`Error::MapFailed`] if the OS cannot satisfy the
    /// mapping; no partial state is left behind in that case.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.base.is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let base = unsafe { kernel::request_memory(self.config.size) }.ok_or(Error::MapFailed)?;

        self.base = Some(base);
        self.free.reset(self.config.size);
        self.allocated.clear();

        info!("Pool mapped: {} bytes at {:p}.", self.config.size, base);
        Ok(())
    }

    /// Allocates `size` bytes and returns a pointer into the pool.
    ///
    /// `size` must be a positive multiple of the configured granularity;
    /// anything else is rejected with [`Error::InvalidSize`] before any
    /// bookkeeping is touched. A well-formed request that no free block can
    /// hold fails with [`Error::OutOfMemory`].
    ///
    /// The free list is scanned in ascending-offset order and the first
    /// block large enough is used (first-fit). This is a deliberate
    /// simplicity tradeoff: the scan is O(free blocks) and fragmentation is
    /// only fought by coalescing on free.
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<u8>, Error> {
        let base = self.base.ok_or(Error::Uninitialized)?;

        if size == 0 || size % self.config.granularity != 0 {
            return Err(Error::InvalidSize(size));
        }

        if self.allocated.len() == self.config.max_blocks {
            return Err(Error::TooManyBlocks);
        }

        let block = self.free.take_first_fit(size).ok_or(Error::OutOfMemory)?;
        self.allocated.push(block);

        trace!("Allocated {} bytes at offset {}.", block.size, block.offset);

        // base + offset stays inside the mapping because offset + size <= P.
        Ok(unsafe { NonNull::new_unchecked(base.as_ptr().add(block.offset)) })
    }

    /// Returns a previously allocated pointer to the pool and coalesces it
    /// with any adjacent free blocks.
    ///
    /// A null pointer, or any pointer while the pool is uninitialized, is a
    /// silent no-op. A pointer that does not match a live allocation
    /// (foreign, misaligned into a block, or already freed) is rejected
    /// with [`Error::UnknownHandle`] so double-free bugs surface instead of
    /// being masked.
    pub fn deallocate(&mut self, ptr: *mut u8) -> Result<(), Error> {
        let Some(base) = self.base else {
            return Ok(());
        };
        if ptr.is_null() {
            return Ok(());
        }

        let base_addr = base.as_ptr() as usize;
        let addr = ptr as usize;
        if addr < base_addr || addr >= base_addr + self.config.size {
            return Err(Error::UnknownHandle);
        }

        let offset = addr - base_addr;
        let index = self
            .allocated
            .iter()
            .position(|block| block.offset == offset)
            .ok_or(Error::UnknownHandle)?;

        // Check capacity before touching either list so a rejected free
        // leaves the pool untouched.
        if self.free.is_full() {
            return Err(Error::TooManyBlocks);
        }

        let block = self.allocated.remove(index);
        self.free.insert(block);

        trace!(
            "Freed {} bytes at offset {} ({} free blocks after merging).",
            block.size,
            block.offset,
            self.free.len()
        );
        Ok(())
    }

    /// Unmaps the backing memory and empties both block lists.
    ///
    /// If the OS refuses the unmap, the pool reference is kept intact so
    /// the caller can retry or inspect; the error is never swallowed. After
    /// a successful cleanup the pool can be initialized again.
    pub fn cleanup(&mut self) -> Result<(), Error> {
        let base = self.base.ok_or(Error::Uninitialized)?;

        if unsafe { !kernel::return_memory(base.as_ptr(), self.config.size) } {
            return Err(Error::UnmapFailed);
        }

        self.base = None;
        self.free.clear();
        self.allocated.clear();

        info!("Pool unmapped: {} bytes returned to the OS.", self.config.size);
        Ok(())
    }

    /// Whether the pool currently owns a mapping.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.base.is_some()
    }

    #[inline]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Current free blocks, sorted ascending by offset.
    #[inline]
    pub fn free_blocks(&self) -> &[Block] {
        self.free.blocks()
    }

    /// Current live allocations, in allocation order.
    #[inline]
    pub fn allocated_blocks(&self) -> &[Block] {
        &self.allocated
    }
}

impl Default for PagePool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PagePool {
    fn drop(&mut self) {
        // Best-effort unmap; an explicit cleanup() is the place to observe
        // failures.
        if let Some(base) = self.base.take() {
            unsafe {
                let _ = kernel::return_memory(base.as_ptr(), self.config.size);
            }
        }
    }
}
