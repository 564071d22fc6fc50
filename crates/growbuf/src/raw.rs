//! Allocation adapter.
//!
//! [`RawAlloc`] is the seam between the buffers and the heap; [`Global`]
//! forwards to the process allocator. `RawBuf` is the single owner of a raw
//! allocation: it knows a pointer and a capacity, never a length, and is the
//! only code in the crate that allocates, reallocates or frees.

use alloc::alloc::{self as heap, Layout, handle_alloc_error};
use core::{
    marker::PhantomData,
    mem,
    ptr::{self, NonNull},
};

use crate::{error::AllocError, options::GrowthOptions};

/// Allocate / reallocate / free primitives used by every buffer.
///
/// Implementations are cheap handles (`Clone`), since buffers that hand
/// storage to one another need to carry the allocator along.
pub trait RawAlloc: Clone {
    /// Allocate a block for `layout`.
    ///
    /// # Safety
    ///
    /// `layout.size()` must be non-zero.
    unsafe fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Resize a block previously returned by this allocator.
    ///
    /// # Safety
    ///
    /// - `ptr` was allocated by this allocator with `old_layout`.
    /// - `new_size` is non-zero and, rounded up to `old_layout.align()`, does
    ///   not overflow `isize`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Free a block previously returned by this allocator.
    ///
    /// # Safety
    ///
    /// `ptr` was allocated by this allocator with `layout` and is not used
    /// afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide heap (`alloc::alloc`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl RawAlloc for Global {
    unsafe fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: caller guarantees a non-zero size.
        let raw = unsafe { heap::alloc(layout) };
        NonNull::new(raw).ok_or(AllocError::OutOfMemory {
            bytes: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: forwarded from the caller's contract.
        let raw = unsafe { heap::realloc(ptr.as_ptr(), old_layout, new_size) };
        NonNull::new(raw).ok_or(AllocError::OutOfMemory {
            bytes: new_size,
            align: old_layout.align(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { heap::dealloc(ptr.as_ptr(), layout) }
    }
}

/// Pointer + capacity over storage for `T`, owned exclusively.
///
/// Slots are never initialized or dropped here; owners track which prefix is
/// live and drop it before the storage goes away.
pub(crate) struct RawBuf<T, A: RawAlloc = Global> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: `RawBuf` owns its allocation like `Box<[T]>` does.
unsafe impl<T: Send, A: RawAlloc + Send> Send for RawBuf<T, A> {}
// SAFETY: shared access only hands out shared pointers.
unsafe impl<T: Sync, A: RawAlloc + Sync> Sync for RawBuf<T, A> {}

impl<T, A: RawAlloc> RawBuf<T, A> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Pointer to slot 0. Dangling (never null) while unallocated.
    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Like [`ptr`](Self::ptr), but null while nothing is allocated.
    #[inline]
    pub(crate) fn ptr_or_null(&self) -> *const T {
        if self.cap == 0 {
            ptr::null()
        } else {
            self.ptr.as_ptr()
        }
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Grow to exactly `new_cap` slots if currently smaller.
    pub(crate) fn try_grow_exact(&mut self, new_cap: usize) -> Result<(), AllocError> {
        if new_cap <= self.cap {
            return Ok(());
        }

        if Self::IS_ZST {
            self.cap = new_cap;
            return Ok(());
        }

        let new_layout = Layout::array::<T>(new_cap).map_err(|_| AllocError::CapacityOverflow)?;
        let new_ptr = if self.cap == 0 {
            // SAFETY: `new_cap > 0` and `T` is not zero-sized.
            unsafe { self.alloc.allocate(new_layout)? }
        } else {
            // SAFETY: `ptr` came from this allocator with `current_layout`,
            // and `new_layout` was validated by `Layout::array`.
            unsafe {
                self.alloc
                    .reallocate(self.ptr.cast(), self.current_layout(), new_layout.size())?
            }
        };

        tracing::debug!(
            from = self.cap,
            to = new_cap,
            bytes = new_layout.size(),
            "growing buffer"
        );
        self.ptr = new_ptr.cast();
        self.cap = new_cap;
        Ok(())
    }

    /// Grow so that at least `min` slots exist, following `options`.
    ///
    /// `reserved` extra slots are allocated on top of the policy's answer and
    /// are not part of the capacity the policy sees (text buffers keep their
    /// terminator there).
    pub(crate) fn try_reserve(
        &mut self,
        min: usize,
        reserved: usize,
        options: &GrowthOptions,
    ) -> Result<(), AllocError> {
        let current = self.cap.saturating_sub(reserved);
        if min == 0 || (self.cap != 0 && current >= min) {
            return Ok(());
        }

        let target = options.next_capacity(current, min);
        let target_slots = target
            .checked_add(reserved)
            .ok_or(AllocError::CapacityOverflow)?;
        match self.try_grow_exact(target_slots) {
            Err(AllocError::CapacityOverflow) if target > min => {
                // the amortized target overflowed, the request itself may not
                let min_slots = min.checked_add(reserved).ok_or(AllocError::CapacityOverflow)?;
                self.try_grow_exact(min_slots)
            }
            other => other,
        }
    }

    /// Free the allocation and return to the unallocated state. Idempotent.
    pub(crate) fn release(&mut self) {
        if self.cap != 0 && !Self::IS_ZST {
            tracing::debug!(cap = self.cap, "releasing buffer");
            // SAFETY: `ptr` came from this allocator with `current_layout`.
            unsafe { self.alloc.deallocate(self.ptr.cast(), self.current_layout()) };
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }

    /// Move the allocation out, leaving `self` unallocated.
    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Self::new_in(self.alloc.clone()))
    }

    fn current_layout(&self) -> Layout {
        // SAFETY: the same size/align pair passed `Layout::array` when the
        // block was allocated.
        unsafe {
            Layout::from_size_align_unchecked(mem::size_of::<T>() * self.cap, mem::align_of::<T>())
        }
    }
}

impl<T, A: RawAlloc> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Turn a failed reservation into the fatal path: report through `tracing`,
/// then abort (out of memory) or panic (capacity overflow).
#[cold]
#[track_caller]
pub(crate) fn handle_reserve(result: Result<(), AllocError>) {
    match result {
        Ok(()) => {}
        Err(AllocError::CapacityOverflow) => {
            tracing::error!("failed to reallocate buffer: capacity overflow");
            panic!("capacity overflow");
        }
        Err(AllocError::OutOfMemory { bytes, align }) => {
            tracing::error!(bytes, align, "failed to reallocate buffer");
            let layout = Layout::from_size_align(bytes, align).unwrap_or(Layout::new::<u8>());
            handle_alloc_error(layout)
        }
    }
}
