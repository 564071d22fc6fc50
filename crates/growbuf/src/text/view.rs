use core::{ffi::CStr, fmt, ops::Deref, ptr, slice};

use bstr::BStr;

use crate::{
    ascii,
    raw::{Global, RawAlloc, RawBuf, handle_reserve},
    view::{OwnedSlice, View},
};

impl<A: RawAlloc> OwnedSlice<u8, A> {
    /// Copy `bytes` into storage of `bytes.len() + 1` slots, the last one `0`.
    pub(crate) fn copy_terminated_in(bytes: &[u8], alloc: A) -> Self {
        let copy = Self::from_slice_reserved_in(bytes, 1, alloc);
        // SAFETY: one slot past the copied bytes was reserved.
        unsafe { copy.raw_ptr().add(copy.len()).write(0) };
        copy
    }

    /// `len` zero bytes followed by the terminator.
    pub(crate) fn zeroed_terminated_in(len: usize, alloc: A) -> Self {
        let mut buf = RawBuf::new_in(alloc);
        let slots = len
            .checked_add(1)
            .ok_or(crate::AllocError::CapacityOverflow);
        handle_reserve(slots.and_then(|slots| buf.try_grow_exact(slots)));
        // SAFETY: `len + 1` slots were just allocated and are all written.
        unsafe {
            ptr::write_bytes(buf.ptr(), 0, len + 1);
            Self::from_raw_parts(buf, len)
        }
    }
}

/// A run of bytes that either borrows from a [`TextBuffer`] (or any byte
/// slice) or owns a terminated copy.
///
/// Owning views come from cloning, draining and splitting; borrowing views
/// from ranges and trimming. Whether the byte after the contents is a known
/// `0` depends on the origin: owned views always are,
/// ranges cut out of the middle of a buffer are not. See
/// [`as_bytes_with_nul`](Self::as_bytes_with_nul).
///
/// [`TextBuffer`]: crate::TextBuffer
pub struct TextView<'a, A: RawAlloc = Global> {
    inner: View<'a, u8, A>,
    // a borrowed slice that ends with a terminator outside the contents
    borrowed_nul: bool,
}

impl TextView<'static> {
    /// An owned view of `len` zero bytes.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        TextView::with_len_in(len, Global)
    }
}

impl<'a, A: RawAlloc> TextView<'a, A> {
    /// A view of no bytes.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            inner: View::empty(),
            borrowed_nul: false,
        }
    }

    pub(crate) fn borrowed(bytes: &'a [u8]) -> Self {
        Self {
            inner: View::Borrowed(bytes),
            borrowed_nul: false,
        }
    }

    pub(crate) fn borrowed_with_nul(with_nul: &'a [u8]) -> Self {
        debug_assert_eq!(with_nul.last(), Some(&0));
        Self {
            inner: View::Borrowed(with_nul),
            borrowed_nul: true,
        }
    }

    /// Wrap storage whose byte at `len` is a terminator (or that owns no
    /// storage at all).
    pub(crate) fn owned(slice: OwnedSlice<u8, A>) -> TextView<'static, A> {
        debug_assert!(
            slice.allocated() == 0
                // SAFETY: checked to be in bounds first.
                || slice.allocated() > slice.len() && unsafe { *slice.raw_ptr().add(slice.len()) } == 0
        );
        TextView {
            inner: View::Owned(slice),
            borrowed_nul: false,
        }
    }

    /// Borrow the bytes of `cstr`, without the terminator. The view stays
    /// terminated.
    #[must_use]
    pub fn from_cstr(cstr: &'a CStr) -> Self {
        Self::borrowed_with_nul(cstr.to_bytes_with_nul())
    }

    /// Borrow `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::borrowed(bytes)
    }

    /// An owned view of `len` zero bytes, drawing storage from `alloc`.
    pub fn with_len_in(len: usize, alloc: A) -> TextView<'static, A> {
        TextView::owned(OwnedSlice::zeroed_terminated_in(len, alloc))
    }

    /// Whether this view owns (and will free) its storage.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.inner.is_owned()
    }

    /// Number of bytes, excluding any terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the view holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The viewed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.inner {
            View::Borrowed(with_nul) if self.borrowed_nul => &with_nul[..with_nul.len() - 1],
            View::Borrowed(bytes) => *bytes,
            View::Owned(owned) => owned.as_slice(),
        }
    }

    /// The viewed bytes plus the terminator, if the view is known to be
    /// terminated.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> Option<&[u8]> {
        match &self.inner {
            View::Borrowed(with_nul) if self.borrowed_nul => Some(*with_nul),
            View::Borrowed(_) => None,
            View::Owned(owned) if owned.allocated() == 0 => Some(b"\0"),
            // SAFETY: owned text storage always keeps a terminator at `len`.
            View::Owned(owned) => {
                Some(unsafe { slice::from_raw_parts(owned.raw_ptr(), owned.len() + 1) })
            }
        }
    }

    /// The viewed bytes as a C string, if terminated and free of interior
    /// `0` bytes.
    #[must_use]
    pub fn as_c_str(&self) -> Option<&CStr> {
        self.as_bytes_with_nul()
            .and_then(|with_nul| CStr::from_bytes_with_nul(with_nul).ok())
    }

    /// Pointer to the first byte. Paired with [`len`](Self::len) it
    /// describes exactly the viewed bytes.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }

    /// The viewed bytes as a [`BStr`], for display.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.as_bytes())
    }

    /// Release the view. Owned storage is freed; a borrow is only
    /// forgotten. Calling it again is a no-op.
    pub fn free(&mut self) {
        *self = Self::empty();
    }

    /// The underlying [`View`], without any terminator.
    #[must_use]
    pub fn into_view(self) -> View<'a, u8, A> {
        match self.inner {
            View::Borrowed(with_nul) if self.borrowed_nul => {
                View::Borrowed(&with_nul[..with_nul.len() - 1])
            }
            inner => inner,
        }
    }

    /// An owned, terminated copy. Owned views copy into their own
    /// allocator; borrowed ones into `A::default()`.
    #[must_use]
    pub fn clone_text(&self) -> TextView<'static, A>
    where
        A: Default,
    {
        let alloc = match &self.inner {
            View::Owned(owned) => owned.allocator().clone(),
            View::Borrowed(_) => A::default(),
        };
        TextView::owned(OwnedSlice::copy_terminated_in(self.as_bytes(), alloc))
    }

    /// Borrow the view without its leading whitespace. Termination is kept.
    #[must_use]
    pub fn trimmed_front(&self) -> TextView<'_, A> {
        let bytes = self.as_bytes();
        let start = bytes
            .iter()
            .position(|&b| !ascii::is_whitespace(b))
            .unwrap_or(bytes.len());
        self.narrow(start, bytes.len())
    }

    /// Borrow the view without its trailing whitespace.
    #[must_use]
    pub fn trimmed_back(&self) -> TextView<'_, A> {
        let bytes = self.as_bytes();
        let end = bytes
            .iter()
            .rposition(|&b| !ascii::is_whitespace(b))
            .map_or(0, |idx| idx + 1);
        self.narrow(0, end)
    }

    /// Borrow the view without leading or trailing whitespace.
    #[must_use]
    pub fn trimmed(&self) -> TextView<'_, A> {
        let bytes = self.as_bytes();
        let Some(start) = bytes.iter().position(|&b| !ascii::is_whitespace(b)) else {
            return TextView::empty();
        };
        let end = bytes
            .iter()
            .rposition(|&b| !ascii::is_whitespace(b))
            .map_or(start, |idx| idx + 1);
        self.narrow(start, end)
    }

    /// Borrow `[start, end)`, keeping the terminator when `end` is the end.
    fn narrow(&self, start: usize, end: usize) -> TextView<'_, A> {
        let bytes = self.as_bytes();
        match self.as_bytes_with_nul() {
            Some(with_nul) if end == bytes.len() => TextView::borrowed_with_nul(&with_nul[start..]),
            _ => TextView::borrowed(&bytes[start..end]),
        }
    }
}

impl<A: RawAlloc> Default for TextView<'_, A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A: RawAlloc> Clone for TextView<'_, A> {
    /// Borrowed views share the borrow; owned views copy into fresh
    /// terminated storage.
    fn clone(&self) -> Self {
        match &self.inner {
            View::Borrowed(bytes) => Self {
                inner: View::Borrowed(*bytes),
                borrowed_nul: self.borrowed_nul,
            },
            View::Owned(owned) => Self {
                inner: View::Owned(OwnedSlice::copy_terminated_in(
                    owned.as_slice(),
                    owned.allocator().clone(),
                )),
                borrowed_nul: false,
            },
        }
    }
}

impl<A: RawAlloc> Deref for TextView<'_, A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: RawAlloc> AsRef<[u8]> for TextView<'_, A> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<'a, A: RawAlloc> From<&'a [u8]> for TextView<'a, A> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::borrowed(bytes)
    }
}

impl<'a, A: RawAlloc> From<&'a str> for TextView<'a, A> {
    fn from(text: &'a str) -> Self {
        Self::borrowed(text.as_bytes())
    }
}

impl<'a, A: RawAlloc> From<&'a CStr> for TextView<'a, A> {
    fn from(cstr: &'a CStr) -> Self {
        Self::from_cstr(cstr)
    }
}

impl<A: RawAlloc> fmt::Display for TextView<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

impl<A: RawAlloc> fmt::Debug for TextView<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_owned() { "Owned" } else { "Borrowed" };
        f.debug_tuple(kind).field(&self.as_bstr()).finish()
    }
}

impl<A: RawAlloc, B: RawAlloc> PartialEq<TextView<'_, B>> for TextView<'_, A> {
    fn eq(&self, other: &TextView<'_, B>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> Eq for TextView<'_, A> {}

impl<A: RawAlloc> PartialEq<str> for TextView<'_, A> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> PartialEq<&str> for TextView<'_, A> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> PartialEq<[u8]> for TextView<'_, A> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<A: RawAlloc> PartialEq<&[u8]> for TextView<'_, A> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}
