use thiserror::Error;

/// Every failure the allocator can report.
///
/// Failures fall into three groups and are never conflated:
///
/// - Operating system failures ([`Error::MapFailed`], [`Error::UnmapFailed`])
///   mean the backing page could not be acquired or released.
/// - Caller-contract violations ([`Error::InvalidSize`],
///   [`Error::UnknownHandle`], lifecycle misuse) are rejected before any
///   bookkeeping is touched.
/// - Resource exhaustion ([`Error::OutOfMemory`], [`Error::TooManyBlocks`])
///   means the request was well-formed but cannot be satisfied right now.
///
/// No operation retries internally; a failed operation leaves both block
/// lists exactly as they were.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The operating system refused to map the backing page.
    #[error("the operating system could not map the pool")]
    MapFailed,

    /// The operating system refused to unmap the backing page. The pool
    /// reference is kept so the caller can retry or diagnose.
    #[error("the operating system could not unmap the pool")]
    UnmapFailed,

    /// An operation needed a mapped pool but none exists.
    #[error("the pool is not initialized")]
    Uninitialized,

    /// `init` was called on a pool that is already mapped.
    #[error("the pool is already initialized")]
    AlreadyInitialized,

    /// The pool configuration is unusable.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),

    /// The requested size is zero or not a multiple of the granularity.
    #[error("invalid allocation size {0}: must be a positive multiple of the granularity")]
    InvalidSize(usize),

    /// No free block is large enough for the request.
    #[error("no free block large enough for the request")]
    OutOfMemory,

    /// One of the block lists reached its configured maximum. Reported
    /// instead of silently overwriting neighbouring bookkeeping.
    #[error("block list capacity exhausted")]
    TooManyBlocks,

    /// The pointer given to `deallocate` does not match any live
    /// allocation: it is foreign to the pool or was already freed.
    #[error("pointer does not match any live allocation")]
    UnknownHandle,
}
