//! A fixed-capacity, single-arena memory allocator.
//!
//! One page of backing memory is requested from the operating system up
//! front and every allocation is served out of it. The pool never grows:
//! when it is full, allocation fails.
//!
//! ```text
//!                          The pool (one OS page)
//! +---------------------------------------------------------------------+
//! |  alloc  |  alloc  |        free        |  alloc  |       free       |
//! +---------------------------------------------------------------------+
//!      |         |              |               |              |
//!      +---------+-----,        +------,--------+--------------+
//!                      |               |
//!              allocated list      free list (sorted by offset)
//! ```
//!
//! Bookkeeping is two lists of `(offset, size)` descriptors. The free list
//! is kept sorted ascending by offset so allocation is a first-fit scan; a
//! block larger than the request is split and the remainder stays free.
//! Deallocation inserts the range back and immediately coalesces it with
//! any adjacent free blocks, so fragments knit back together as soon as
//! their neighbours are returned.
//!
//! # Quick start
//!
//! ```rust
//! use pagealloc::{PagePool, PoolConfig};
//!
//! let mut pool = PagePool::new();
//! pool.init().expect("could not map the pool");
//!
//! // Sizes must be positive multiples of the configured granularity.
//! let granularity = pool.config().granularity;
//! let ptr = pool.allocate(2 * granularity).unwrap();
//!
//! unsafe { *ptr.as_ptr() = 42 };
//!
//! pool.deallocate(ptr.as_ptr()).unwrap();
//! pool.cleanup().expect("could not unmap the pool");
//! ```
//!
//! # Limitations
//!
//! - Single arena: one mapping per pool, fixed at `init` time.
//! - Sizes must be exact multiples of the granularity; there is no
//!   rounding on behalf of the caller.
//! - Not thread-safe. A pool has exactly one caller context at a time;
//!   share it between threads only behind an external mutex.
//! - No defragmentation beyond adjacent-block coalescing.

mod block;
mod error;
mod freelist;
mod kernel;
mod pool;

pub use block::Block;
pub use error::Error;
pub use pool::{DEFAULT_GRANULARITY, DEFAULT_MAX_BLOCKS, PagePool, PoolConfig};
