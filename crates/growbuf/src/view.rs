//! Views over contiguous storage: borrowed ranges and owned copies.

use core::{fmt, ops::Deref, slice};

use crate::raw::{Global, RawAlloc, RawBuf, handle_reserve};

/// Exact-length owned storage, produced by cloning, draining and splitting.
///
/// Unlike a [`Sequence`](crate::Sequence) it never grows. Elements are
/// dropped and the storage freed on [`free`](Self::free) or drop.
pub struct OwnedSlice<T, A: RawAlloc = Global> {
    buf: RawBuf<T, A>,
    len: usize,
}

impl<T, A: RawAlloc> OwnedSlice<T, A> {
    /// Adopt `buf`, whose first `len` slots are initialized.
    ///
    /// # Safety
    ///
    /// `len <= buf.capacity()` and slots `0..len` hold live values that
    /// nothing else will drop.
    pub(crate) unsafe fn from_raw_parts(buf: RawBuf<T, A>, len: usize) -> Self {
        debug_assert!(len <= buf.capacity());
        Self { buf, len }
    }

    /// Clone `items` into storage of exactly `items.len() + reserved` slots.
    pub(crate) fn from_slice_reserved_in(items: &[T], reserved: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut out = Self {
            buf: RawBuf::new_in(alloc),
            len: 0,
        };
        let slots = items.len().checked_add(reserved);
        handle_reserve(slots.map_or(Err(crate::AllocError::CapacityOverflow), |slots| {
            out.buf.try_grow_exact(slots)
        }));
        for item in items {
            // SAFETY: capacity covers `items.len()`; `len` tracks every
            // written slot so a panicking `clone` drops exactly those.
            unsafe { out.buf.ptr().add(out.len).write(item.clone()) };
            out.len += 1;
        }
        out
    }

    pub(crate) fn from_slice_in(items: &[T], alloc: A) -> Self
    where
        T: Clone,
    {
        Self::from_slice_reserved_in(items, 0, alloc)
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The elements.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `0..len` are live; `ptr` is aligned and non-null.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with unique access.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Slots allocated behind the elements (at least `len`).
    pub(crate) fn allocated(&self) -> usize {
        self.buf.capacity()
    }

    pub(crate) fn raw_ptr(&self) -> *mut T {
        self.buf.ptr()
    }

    pub(crate) fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Free the storage without dropping the elements.
    ///
    /// # Safety
    ///
    /// Every element must already have been moved out bitwise.
    pub(crate) unsafe fn forget_elements(mut self) {
        self.len = 0;
    }

    /// Drop the elements and free the storage. Idempotent.
    pub fn free(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        self.len = 0;
        // SAFETY: `len` is cleared first, so nothing is dropped twice.
        unsafe { core::ptr::drop_in_place(live) };
        self.buf.release();
    }
}

impl<T, A: RawAlloc> Drop for OwnedSlice<T, A> {
    fn drop(&mut self) {
        self.free();
    }
}

impl<T, A: RawAlloc> Deref for OwnedSlice<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for OwnedSlice<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A contiguous run of `T` that either borrows from a buffer or owns a copy.
///
/// `Borrowed` views come from range operations and keep their source
/// borrowed for `'a`, so the source can neither grow nor be freed while they
/// exist. `Owned` views come from cloning, draining and splitting and free
/// their storage when dropped or [freed](Self::free).
pub enum View<'a, T, A: RawAlloc = Global> {
    /// Aliases storage owned by someone else.
    Borrowed(&'a [T]),
    /// Owns its storage.
    Owned(OwnedSlice<T, A>),
}

impl<'a, T, A: RawAlloc> View<'a, T, A> {
    /// A view of no elements.
    #[must_use]
    pub const fn empty() -> Self {
        View::Borrowed(&[])
    }

    /// Whether this view owns (and will free) its storage.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, View::Owned(_))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The elements.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            View::Borrowed(items) => *items,
            View::Owned(owned) => owned.as_slice(),
        }
    }

    /// Release the view: owned storage is freed, a borrow is simply
    /// forgotten. Either way the view is empty afterwards, and calling it
    /// again is a no-op.
    pub fn free(&mut self) {
        *self = View::empty();
    }

    /// Turn the view into owned storage, copying only if it borrows.
    #[must_use]
    pub fn into_owned(self) -> OwnedSlice<T, A>
    where
        T: Clone,
        A: Default,
    {
        match self {
            View::Borrowed(items) => OwnedSlice::from_slice_in(items, A::default()),
            View::Owned(owned) => owned,
        }
    }
}

impl<T, A: RawAlloc> Default for View<'_, T, A> {
    fn default() -> Self {
        View::empty()
    }
}

impl<T, A: RawAlloc> Deref for View<'_, T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for View<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Borrowed(items) => f.debug_tuple("Borrowed").field(items).finish(),
            View::Owned(owned) => f.debug_tuple("Owned").field(&owned.as_slice()).finish(),
        }
    }
}

impl<T: PartialEq, A: RawAlloc, B: RawAlloc> PartialEq<View<'_, T, B>> for View<'_, T, A> {
    fn eq(&self, other: &View<'_, T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, A: RawAlloc> From<OwnedSlice<T, A>> for View<'static, T, A> {
    fn from(owned: OwnedSlice<T, A>) -> Self {
        View::Owned(owned)
    }
}

impl<'a, T, A: RawAlloc> From<&'a [T]> for View<'a, T, A> {
    fn from(items: &'a [T]) -> Self {
        View::Borrowed(items)
    }
}
