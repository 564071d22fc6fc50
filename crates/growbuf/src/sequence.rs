//! The growable sequence.

use core::{
    fmt,
    ops::{Deref, DerefMut},
    ptr, slice,
};

use crate::{
    error::AllocError,
    options::GrowthOptions,
    raw::{Global, RawAlloc, RawBuf, handle_reserve},
    view::{OwnedSlice, View},
};

/// An owning, growable, contiguous sequence of `T`.
///
/// A fresh sequence owns no allocation; the first growing call allocates
/// `start_capacity` slots (see [`GrowthOptions`]). Storage is released on
/// [`free`](Self::free) or on drop, whichever comes first.
///
/// Removing from an empty sequence with [`pop`](Self::pop) or
/// [`shift`](Self::shift) is a caller bug and panics; the `_opt` forms
/// return `None` instead. Out-of-range arguments to range operations are
/// not bugs: they degrade to an empty result.
///
/// ```rust
/// use growbuf::Sequence;
///
/// let mut seq = Sequence::from_slice(&[1, 2, 3, 4, 5]);
/// assert_eq!(seq.range_view(2, 4).as_slice(), &[3, 4]);
///
/// seq.push(6);
/// assert_eq!(seq.pop(), 6);
/// assert_eq!(seq.pop_opt(), Some(5));
/// ```
pub struct Sequence<T, A: RawAlloc = Global> {
    buf: RawBuf<T, A>,
    len: usize,
    options: GrowthOptions,
}

impl<T> Sequence<T> {
    /// An empty sequence with default growth options. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// An empty sequence with the given growth options. Does not allocate.
    #[must_use]
    pub const fn with_options(options: GrowthOptions) -> Self {
        Self::with_options_in(options, Global)
    }

    /// A sequence with room for exactly `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut seq = Self::new();
        handle_reserve(seq.buf.try_grow_exact(capacity));
        seq
    }

    /// Clone `items` into a new sequence whose capacity equals its length.
    #[must_use]
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut seq = Self::with_capacity(items.len());
        seq.append(items);
        seq
    }
}

impl<T, A: RawAlloc> Sequence<T, A> {
    /// An empty sequence drawing storage from `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self::with_options_in(GrowthOptions::DEFAULT, alloc)
    }

    /// An empty sequence with the given options, drawing storage from
    /// `alloc`.
    pub const fn with_options_in(options: GrowthOptions, alloc: A) -> Self {
        Self {
            buf: RawBuf::new_in(alloc),
            len: 0,
            options,
        }
    }

    /// Number of live elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the sequence holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated element slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The growth options this sequence was created with.
    #[must_use]
    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// The allocator backing this sequence.
    #[must_use]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Pointer to the first slot, or null when nothing is allocated.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr_or_null()
    }

    /// The live elements.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized; `ptr` is non-null
        // and aligned even when unallocated.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The live elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with unique access through `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Make sure at least `min_capacity` slots are allocated.
    ///
    /// Never shrinks. An unallocated sequence grows to `start_capacity` (or
    /// `min_capacity` if larger); an allocated one to
    /// `min_capacity * growth_factor`. Any resize moves the storage, which the
    /// borrow checker already forbids while views into it are alive.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow. Aborts the process if the allocator
    /// fails; use [`try_ensure_capacity`](Self::try_ensure_capacity) to
    /// handle that instead.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        handle_reserve(self.try_ensure_capacity(min_capacity));
    }

    /// Fallible form of [`ensure_capacity`](Self::ensure_capacity).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the new capacity overflows or the allocator
    /// refuses it; the sequence is left unchanged.
    pub fn try_ensure_capacity(&mut self, min_capacity: usize) -> Result<(), AllocError> {
        self.buf.try_reserve(min_capacity, 0, &self.options)
    }

    fn grow_for(&mut self, additional: usize) {
        let Some(min) = self.len.checked_add(additional) else {
            handle_reserve(Err(AllocError::CapacityOverflow));
            return;
        };
        self.ensure_capacity(min);
    }

    /// Append `item` at the tail. Amortized O(1).
    pub fn push(&mut self, item: T) {
        self.grow_for(1);
        // SAFETY: slot `len` is allocated and uninitialized.
        unsafe { ptr::write(self.buf.ptr().add(self.len), item) };
        self.len += 1;
    }

    /// Remove and return the last element.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn pop(&mut self) -> T {
        assert!(
            self.len >= 1,
            "Vector failed to pop, expected length of >= 1, but got length of 0"
        );
        self.len -= 1;
        // SAFETY: slot `len` was live and is no longer counted.
        unsafe { ptr::read(self.buf.ptr().add(self.len)) }
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop_opt(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            Some(self.pop())
        }
    }

    /// Insert `item` at the head. O(n).
    pub fn unshift(&mut self, item: T) {
        self.grow_for(1);
        let base = self.buf.ptr();
        // SAFETY: `len + 1` slots are allocated; the copy may overlap.
        unsafe {
            ptr::copy(base, base.add(1), self.len);
            ptr::write(base, item);
        }
        self.len += 1;
    }

    /// Remove and return the first element. O(n).
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn shift(&mut self) -> T {
        assert!(
            self.len >= 1,
            "Vector failed to shift, expected length of >= 1, but got length of 0"
        );
        let base = self.buf.ptr();
        // SAFETY: slot 0 is live; the remaining `len - 1` live slots move
        // down by one.
        let first = unsafe {
            let first = ptr::read(base);
            ptr::copy(base.add(1), base, self.len - 1);
            first
        };
        self.len -= 1;
        first
    }

    /// Remove and return the first element, or `None` if empty.
    pub fn shift_opt(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            Some(self.shift())
        }
    }

    /// Clone `items` onto the tail, reserving once.
    pub fn append(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.grow_for(items.len());
        for item in items {
            // SAFETY: capacity covers `len + items.len()`; `len` is bumped
            // per element so a panicking `clone` leaks nothing live.
            unsafe { ptr::write(self.buf.ptr().add(self.len), item.clone()) };
            self.len += 1;
        }
    }

    /// Clone `items` in front of the existing elements, reserving once.
    pub fn prepend(&mut self, items: &[T])
    where
        T: Clone,
    {
        if items.is_empty() {
            return;
        }
        let cloned = OwnedSlice::from_slice_in(items, self.buf.allocator().clone());
        self.prepend_owned(cloned);
    }

    fn prepend_owned(&mut self, items: OwnedSlice<T, A>) {
        let n = items.len();
        self.grow_for(n);
        let base = self.buf.ptr();
        // SAFETY: capacity covers `len + n`; live elements move right by `n`
        // (overlapping), then the head is filled by a bitwise move out of
        // `items`, whose storage is then freed without dropping elements.
        unsafe {
            ptr::copy(base, base.add(n), self.len);
            ptr::copy_nonoverlapping(items.as_slice().as_ptr(), base, n);
            items.forget_elements();
        }
        self.len += n;
    }

    /// Drop all elements, keeping the allocation.
    pub fn empty(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        self.len = 0;
        // SAFETY: `len` is reset first so a panicking drop cannot cause a
        // double drop.
        unsafe { ptr::drop_in_place(live) };
    }

    /// Drop all elements, free the allocation and return to the empty,
    /// unallocated state. Calling it again is a no-op.
    pub fn free(&mut self) {
        self.empty();
        self.buf.release();
    }

    /// Copy the live elements (not the spare capacity) into fresh storage.
    #[must_use]
    pub fn clone_items(&self) -> OwnedSlice<T, A>
    where
        T: Clone,
    {
        OwnedSlice::from_slice_in(self.as_slice(), self.buf.allocator().clone())
    }

    /// An owning view over a copy of the live elements.
    #[must_use]
    pub fn owned_view(&self) -> View<'static, T, A>
    where
        T: Clone,
    {
        View::Owned(self.clone_items())
    }

    /// A borrowing view over `[start, end)`.
    ///
    /// Returns an empty view when `start >= end` or `end > len`.
    #[must_use]
    pub fn range_view(&self, start: usize, end: usize) -> View<'_, T, A> {
        View::Borrowed(self.as_slice().get(start..end).unwrap_or(&[]))
    }

    /// Iterate over the live elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Hand the storage over as an owned slice without copying. Spare
    /// capacity stays allocated behind the slice until it is freed.
    #[must_use]
    pub fn into_owned_slice(mut self) -> OwnedSlice<T, A> {
        let len = core::mem::replace(&mut self.len, 0);
        // SAFETY: the first `len` slots of the taken buffer are live, and
        // `self` no longer counts them.
        unsafe { OwnedSlice::from_raw_parts(self.buf.take(), len) }
    }
}

impl<T, A: RawAlloc> Drop for Sequence<T, A> {
    fn drop(&mut self) {
        self.empty();
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: RawAlloc> Deref for Sequence<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAlloc> DerefMut for Sequence<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for Sequence<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone, A: RawAlloc> Clone for Sequence<T, A> {
    fn clone(&self) -> Self {
        let mut seq = Self::with_options_in(self.options, self.buf.allocator().clone());
        handle_reserve(seq.buf.try_grow_exact(self.len));
        seq.append(self.as_slice());
        seq
    }
}

impl<T: PartialEq, A: RawAlloc, B: RawAlloc> PartialEq<Sequence<T, B>> for Sequence<T, A> {
    fn eq(&self, other: &Sequence<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: RawAlloc> Eq for Sequence<T, A> {}

impl<T, A: RawAlloc> Extend<T> for Sequence<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.grow_for(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

impl<'a, T, A: RawAlloc> IntoIterator for &'a Sequence<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
