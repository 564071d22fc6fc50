use bstr::ByteSlice;

use super::{TextBuffer, TextParts, TextView};
use crate::{raw::RawAlloc, sequence::Sequence, view::OwnedSlice};

impl<A: RawAlloc> TextBuffer<A> {
    fn owned_part(&self, bytes: &[u8]) -> TextView<'static, A> {
        TextView::owned(OwnedSlice::copy_terminated_in(bytes, self.allocator().clone()))
    }

    fn parts_with<'b>(&self, pieces: impl Iterator<Item = &'b [u8]>) -> TextParts<A> {
        let mut parts = Sequence::with_options_in(*self.options(), self.allocator().clone());
        for piece in pieces {
            parts.push(self.owned_part(piece));
        }
        parts
    }

    /// Split on every occurrence of `delimiter`.
    ///
    /// `k` delimiters give `k + 1` owned parts (empty ones included), and
    /// joining them with `delimiter` gives back the contents. The buffer is
    /// not modified.
    ///
    /// ```rust
    /// use growbuf::TextBuffer;
    ///
    /// let buf = TextBuffer::from("foo bar baz");
    /// let parts = buf.split_by(b' ');
    /// assert_eq!(parts.len(), 3);
    /// assert_eq!(parts[1], "bar");
    /// ```
    #[must_use]
    pub fn split_by(&self, delimiter: u8) -> TextParts<A> {
        self.parts_with(self.as_bytes().split(move |&b| b == delimiter))
    }

    /// Split on every byte that appears in `delimiters`.
    #[must_use]
    pub fn split_by_many(&self, delimiters: &[u8]) -> TextParts<A> {
        self.parts_with(self.as_bytes().split(|b| delimiters.contains(b)))
    }

    /// Split at the first `delimiter` into exactly two parts. Without a
    /// delimiter the first part is the whole contents and the second is
    /// empty.
    #[must_use]
    pub fn split_by_once(&self, delimiter: u8) -> TextParts<A> {
        let bytes = self.as_bytes();
        let (head, tail) = match bytes.find_byte(delimiter) {
            Some(idx) => (&bytes[..idx], &bytes[idx + 1..]),
            None => (bytes, &bytes[bytes.len()..]),
        };
        self.parts_with([head, tail].into_iter())
    }

    /// Split into `[0, idx)` and `[idx, len)`. An index at or past the end
    /// gives a single part holding the whole contents.
    #[must_use]
    pub fn split_at(&self, idx: usize) -> TextParts<A> {
        let bytes = self.as_bytes();
        if idx >= bytes.len() {
            return self.parts_with(core::iter::once(bytes));
        }
        let (head, tail) = bytes.split_at(idx);
        self.parts_with([head, tail].into_iter())
    }
}
