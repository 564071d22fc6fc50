use thiserror::Error;

/// Failure to obtain storage for a buffer.
///
/// Returned by the fallible `try_*` growth calls. The infallible calls
/// report the same condition through `tracing` and abort instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count does not fit in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator returned null for a valid layout.
    #[error("out of memory: failed to allocate {bytes} bytes (align {align})")]
    OutOfMemory {
        /// Requested allocation size in bytes.
        bytes: usize,
        /// Requested alignment.
        align: usize,
    },
}
