//! A growable, null-terminated byte string.

mod format;
#[cfg(feature = "std")]
mod read;
mod split;
mod view;

use core::{
    ffi::{CStr, FromBytesWithNulError},
    fmt,
    ops::Deref,
    ptr, slice,
};

use bstr::{BStr, ByteSlice};
#[cfg(feature = "std")]
pub use read::read_lines;
pub use view::TextView;

use crate::{
    ascii,
    error::AllocError,
    options::GrowthOptions,
    raw::{Global, RawAlloc, RawBuf, handle_reserve},
    sequence::Sequence,
    view::OwnedSlice,
};

/// Owned text parts, as returned by the splitting operations and filled by
/// [`read_lines`].
pub type TextParts<A = Global> = Sequence<TextView<'static, A>, A>;

/// A growable byte string that keeps a `0` byte right after its contents.
///
/// The terminator lives in one extra allocated byte that is not counted in
/// [`capacity`](Self::capacity), so `as_bytes_with_nul` and `as_c_str` are
/// always available without copying. Contents are bytes, not UTF-8; display
/// goes through [`BStr`] and prints exactly `len` bytes.
///
/// ```rust
/// use growbuf::{TextBuffer, appendf};
///
/// let mut buf = TextBuffer::new();
/// buf.push_char(b'[');
/// buf.append("foobar");
/// buf.push_char(b']');
/// assert_eq!(buf, "[foobar]");
///
/// appendf!(buf, " NUMBER: {}", 4).unwrap();
/// assert_eq!(buf.as_bytes_with_nul(), b"[foobar] NUMBER: 4\0");
/// ```
pub struct TextBuffer<A: RawAlloc = Global> {
    buf: RawBuf<u8, A>,
    len: usize,
    options: GrowthOptions,
}

impl TextBuffer {
    /// An empty buffer with default growth options. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// An empty buffer with the given growth options. Does not allocate.
    #[must_use]
    pub const fn with_options(options: GrowthOptions) -> Self {
        Self::with_options_in(options, Global)
    }

    /// An empty buffer with room for exactly `capacity` bytes (plus the
    /// terminator).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// A buffer holding a copy of `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Self::new();
        buf.append(bytes);
        buf
    }
}

impl<A: RawAlloc> TextBuffer<A> {
    /// An empty buffer drawing storage from `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self::with_options_in(GrowthOptions::DEFAULT, alloc)
    }

    /// An empty buffer with the given options, drawing storage from `alloc`.
    pub const fn with_options_in(options: GrowthOptions, alloc: A) -> Self {
        Self {
            buf: RawBuf::new_in(alloc),
            len: 0,
            options,
        }
    }

    /// An empty buffer with room for exactly `capacity` bytes, drawing
    /// storage from `alloc`.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        let mut text = Self::new_in(alloc);
        let slots = capacity.checked_add(1).ok_or(AllocError::CapacityOverflow);
        handle_reserve(slots.and_then(|slots| text.buf.try_grow_exact(slots)));
        text.terminate();
        text
    }

    /// Number of bytes, excluding the terminator.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes that fit without reallocating, excluding the terminator slot.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity().saturating_sub(1)
    }

    /// The growth options this buffer was created with.
    #[must_use]
    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// Pointer to the first byte, or null when nothing is allocated. When
    /// non-null it points at a `0`-terminated run of `len` bytes.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.buf.ptr_or_null()
    }

    /// The contents, without the terminator.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: bytes `0..len` are initialized; `ptr` is non-null even when
        // unallocated.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The contents, mutably. The terminator stays out of reach.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        // SAFETY: as in `as_bytes`, with unique access.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// The contents followed by the terminator.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.buf.capacity() == 0 {
            return b"\0";
        }
        // SAFETY: an allocated buffer always holds `len + 1` initialized
        // bytes, the last being the terminator.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len + 1) }
    }

    /// The contents as a C string.
    ///
    /// # Errors
    ///
    /// Fails if the contents contain an interior `0` byte.
    pub fn as_c_str(&self) -> Result<&CStr, FromBytesWithNulError> {
        CStr::from_bytes_with_nul(self.as_bytes_with_nul())
    }

    /// The contents as a [`BStr`], for display.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.as_bytes())
    }

    /// A borrowing view over the whole contents.
    #[must_use]
    pub fn as_view(&self) -> TextView<'_, A> {
        TextView::borrowed_with_nul(self.as_bytes_with_nul())
    }

    #[inline]
    fn terminate(&mut self) {
        if self.buf.capacity() != 0 {
            // SAFETY: an allocated buffer has at least `len + 1` slots.
            unsafe { self.buf.ptr().add(self.len).write(0) };
        }
    }

    /// Make sure at least `min_capacity` bytes fit, plus the terminator.
    ///
    /// Follows the same growth policy as
    /// [`Sequence::ensure_capacity`](crate::Sequence::ensure_capacity).
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; aborts if the allocator fails.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        handle_reserve(self.try_ensure_capacity(min_capacity));
    }

    /// Fallible form of [`ensure_capacity`](Self::ensure_capacity).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the new capacity overflows or the allocator
    /// refuses it; the buffer is left unchanged.
    pub fn try_ensure_capacity(&mut self, min_capacity: usize) -> Result<(), AllocError> {
        self.buf.try_reserve(min_capacity, 1, &self.options)?;
        self.terminate();
        Ok(())
    }

    fn grow_for(&mut self, additional: usize) {
        match self.len.checked_add(additional) {
            Some(min) => self.ensure_capacity(min),
            None => handle_reserve(Err(AllocError::CapacityOverflow)),
        }
    }

    /// Room for `additional` more bytes, as writable (uninitialized) tail
    /// memory starting at `len`.
    pub(crate) fn spare_tail(&mut self, additional: usize) -> *mut u8 {
        self.grow_for(additional);
        // SAFETY: capacity now covers `len + additional + 1`.
        unsafe { self.buf.ptr().add(self.len) }
    }

    /// Commit `written` bytes placed at the tail by [`spare_tail`](Self::spare_tail).
    ///
    /// # Safety
    ///
    /// `written` bytes were initialized within the reserved tail.
    pub(crate) unsafe fn commit_tail(&mut self, written: usize) {
        self.len += written;
        self.terminate();
    }

    /// Re-establish the terminator after an abandoned tail write.
    pub(crate) fn abandon_tail(&mut self) {
        self.terminate();
    }

    pub(crate) fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Append one byte.
    pub fn push_char(&mut self, byte: u8) {
        self.append([byte]);
    }

    /// Insert one byte at the front.
    pub fn unshift_char(&mut self, byte: u8) {
        self.prepend([byte]);
    }

    /// Append `bytes`, reserving once.
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return;
        }
        let tail = self.spare_tail(bytes.len());
        // SAFETY: `spare_tail` reserved `bytes.len()` bytes; `bytes` cannot
        // alias `self`, which is borrowed mutably.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), tail, bytes.len());
            self.commit_tail(bytes.len());
        }
    }

    /// Append `bytes` up to the first `0`, or all of them if there is none.
    ///
    /// ```rust
    /// use growbuf::TextBuffer;
    ///
    /// let mut buf = TextBuffer::from("id=");
    /// buf.append_cstr(b"42\0junk");
    /// buf.append_cstr(c"!".to_bytes_with_nul());
    /// buf.append_cstr("?");
    /// assert_eq!(buf, "id=42!?");
    /// ```
    pub fn append_cstr(&mut self, bytes: impl AsRef<[u8]>) {
        let bytes = bytes.as_ref();
        let end = bytes.find_byte(0).unwrap_or(bytes.len());
        self.append(&bytes[..end]);
    }

    /// Insert `bytes` at the front, moving the current contents once.
    pub fn prepend(&mut self, bytes: impl AsRef<[u8]>) {
        let bytes = bytes.as_ref();
        let n = bytes.len();
        if n == 0 {
            return;
        }
        self.grow_for(n);
        let base = self.buf.ptr();
        // SAFETY: capacity covers `len + n + 1`; the existing contents move
        // right (overlapping copy), then the head is filled from `bytes`.
        unsafe {
            ptr::copy(base, base.add(n), self.len);
            ptr::copy_nonoverlapping(bytes.as_ptr(), base, n);
        }
        self.len += n;
        self.terminate();
    }

    /// Remove and return the last byte.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn pop_char(&mut self) -> u8 {
        assert!(
            self.len >= 1,
            "String failed to pop, expected length of >= 1, but got length of 0"
        );
        self.len -= 1;
        let last = self.as_bytes_with_nul()[self.len];
        self.terminate();
        last
    }

    /// Remove and return the last byte, or `None` if empty.
    pub fn pop_char_opt(&mut self) -> Option<u8> {
        if self.len == 0 {
            None
        } else {
            Some(self.pop_char())
        }
    }

    /// Remove and return the first byte. O(n).
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn shift_char(&mut self) -> u8 {
        assert!(
            self.len >= 1,
            "String failed to shift, expected length of >= 1, but got length of 0"
        );
        let first = self.as_bytes()[0];
        self.remove_range(0, 1);
        first
    }

    /// Remove and return the first byte, or `None` if empty.
    pub fn shift_char_opt(&mut self) -> Option<u8> {
        if self.len == 0 {
            None
        } else {
            Some(self.shift_char())
        }
    }

    /// Copy the contents into fresh, terminated storage.
    #[must_use]
    pub fn clone_chars(&self) -> OwnedSlice<u8, A> {
        OwnedSlice::copy_terminated_in(self.as_bytes(), self.allocator().clone())
    }

    /// An owning view over a copy of the contents.
    #[must_use]
    pub fn owned_view(&self) -> TextView<'static, A> {
        TextView::owned(self.clone_chars())
    }

    /// A borrowing view over `[start, end)`.
    ///
    /// Returns an empty view when `start >= len`, `end > len` or
    /// `start >= end`. Only a view that reaches the end of the buffer is
    /// known to be terminated.
    #[must_use]
    pub fn range_view(&self, start: usize, end: usize) -> TextView<'_, A> {
        match self.checked_range(start, end) {
            Some(_) if end == self.len => {
                TextView::borrowed_with_nul(&self.as_bytes_with_nul()[start..])
            }
            Some(bytes) => TextView::borrowed(bytes),
            None => TextView::empty(),
        }
    }

    fn checked_range(&self, start: usize, end: usize) -> Option<&[u8]> {
        if start >= self.len || end > self.len || start >= end {
            return None;
        }
        Some(&self.as_bytes()[start..end])
    }

    /// Hand the whole allocation to an owned view, leaving `self` empty and
    /// unallocated. Nothing is copied.
    ///
    /// Draining a buffer that never allocated yields an owned view without
    /// storage.
    pub fn drain(&mut self) -> TextView<'static, A> {
        let len = core::mem::replace(&mut self.len, 0);
        // SAFETY: the first `len` bytes of the taken allocation are
        // initialized (and followed by the terminator).
        TextView::owned(unsafe { OwnedSlice::from_raw_parts(self.buf.take(), len) })
    }

    /// Remove `[start, end)` and return it as an owned, terminated copy.
    ///
    /// Invalid ranges leave the buffer untouched and yield an empty view.
    pub fn drain_range(&mut self, start: usize, end: usize) -> TextView<'static, A> {
        let drained = OwnedSlice::copy_terminated_in(
            self.checked_range(start, end).unwrap_or_default(),
            self.allocator().clone(),
        );
        self.remove_range(start, end);
        TextView::owned(drained)
    }

    /// Remove the byte at `idx`; out-of-range indices are ignored.
    pub fn remove(&mut self, idx: usize) {
        if let Some(end) = idx.checked_add(1) {
            self.remove_range(idx, end);
        }
    }

    /// Remove `[start, end)`, closing the gap.
    ///
    /// Does nothing when `start >= len`, `end > len` or `start >= end`.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        if start >= self.len || end > self.len || start >= end {
            return;
        }

        if end < self.len {
            let base = self.buf.ptr();
            // SAFETY: both ranges lie within the live bytes; they may overlap.
            unsafe { ptr::copy(base.add(end), base.add(start), self.len - end) };
        }
        self.len -= end - start;
        self.terminate();
    }

    /// Clear the contents, keeping the allocation.
    pub fn empty(&mut self) {
        self.len = 0;
        self.terminate();
    }

    /// Free the allocation and return to the empty, unallocated state.
    /// Calling it again is a no-op.
    pub fn free(&mut self) {
        self.len = 0;
        self.buf.release();
    }

    /// Remove leading whitespace (see [`ascii::is_whitespace`]).
    pub fn trim_front(&mut self) {
        let end = self
            .as_bytes()
            .iter()
            .position(|&b| !ascii::is_whitespace(b))
            .unwrap_or(self.len);
        self.remove_range(0, end);
    }

    /// Remove trailing whitespace (see [`ascii::is_whitespace`]).
    pub fn trim_back(&mut self) {
        let start = self
            .as_bytes()
            .iter()
            .rposition(|&b| !ascii::is_whitespace(b))
            .map_or(0, |idx| idx + 1);
        self.remove_range(start, self.len);
    }

    /// Remove leading and trailing whitespace.
    pub fn trim(&mut self) {
        self.trim_back();
        self.trim_front();
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: RawAlloc> Clone for TextBuffer<A> {
    fn clone(&self) -> Self {
        let mut text = Self::with_options_in(self.options, self.allocator().clone());
        text.append(self.as_bytes());
        text
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<&[u8]> for TextBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl<A: RawAlloc> Deref for TextBuffer<A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: RawAlloc> AsRef<[u8]> for TextBuffer<A> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: RawAlloc> fmt::Write for TextBuffer<A> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }
}

impl<A: RawAlloc> fmt::Display for TextBuffer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

impl<A: RawAlloc> fmt::Debug for TextBuffer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_bstr(), f)
    }
}

impl<A: RawAlloc, B: RawAlloc> PartialEq<TextBuffer<B>> for TextBuffer<A> {
    fn eq(&self, other: &TextBuffer<B>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> Eq for TextBuffer<A> {}

impl<A: RawAlloc> PartialEq<str> for TextBuffer<A> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> PartialEq<&str> for TextBuffer<A> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> PartialEq<[u8]> for TextBuffer<A> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}
