use core::{fmt, ptr};

use super::TextBuffer;
use crate::{raw::RawAlloc, view::OwnedSlice};

/// Counts the bytes a format pass would produce.
struct Measure(usize);

impl fmt::Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}

/// Writes into reserved tail memory, refusing to go past `limit`.
struct Tail {
    ptr: *mut u8,
    written: usize,
    limit: usize,
}

impl fmt::Write for Tail {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() > self.limit - self.written {
            return Err(fmt::Error);
        }
        // SAFETY: `ptr..ptr + limit` is reserved, and the check above keeps
        // this write inside it.
        unsafe { ptr::copy_nonoverlapping(s.as_ptr(), self.ptr.add(self.written), s.len()) };
        self.written += s.len();
        Ok(())
    }
}

impl<A: RawAlloc> TextBuffer<A> {
    /// Append formatted text, growing at most once.
    ///
    /// The arguments are formatted twice: once to measure, once straight into
    /// the reserved tail. Prefer the [`appendf!`](crate::appendf) macro.
    ///
    /// # Errors
    ///
    /// Propagates a formatting error, or fails if the second pass produces
    /// more bytes than the first. The contents are unchanged on error.
    pub fn append_formatted(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        if let Some(literal) = args.as_str() {
            self.append(literal);
            return Ok(());
        }

        let mut measure = Measure(0);
        fmt::write(&mut measure, args)?;

        let mut tail = Tail {
            ptr: self.spare_tail(measure.0),
            written: 0,
            limit: measure.0,
        };
        match fmt::write(&mut tail, args) {
            Ok(()) => {
                // SAFETY: `Tail` initialized exactly `written` reserved bytes.
                unsafe { self.commit_tail(tail.written) };
                Ok(())
            }
            Err(err) => {
                self.abandon_tail();
                Err(err)
            }
        }
    }

    /// Insert formatted text at the front, moving the current contents once.
    ///
    /// The arguments are measured, then written once into scratch storage of
    /// the measured length. Prefer the [`prependf!`](crate::prependf) macro.
    ///
    /// # Errors
    ///
    /// Propagates a formatting error; the contents are unchanged on error.
    pub fn prepend_formatted(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        if let Some(literal) = args.as_str() {
            self.prepend(literal);
            return Ok(());
        }

        let mut measure = Measure(0);
        fmt::write(&mut measure, args)?;

        let head = OwnedSlice::zeroed_terminated_in(measure.0, self.allocator().clone());
        let mut tail = Tail {
            ptr: head.raw_ptr(),
            written: 0,
            limit: measure.0,
        };
        fmt::write(&mut tail, args)?;
        self.prepend(&head[..tail.written]);
        Ok(())
    }
}

/// Append formatted text to a [`TextBuffer`](crate::TextBuffer).
///
/// ```rust
/// use growbuf::{TextBuffer, appendf};
///
/// let mut buf = TextBuffer::from("x = ");
/// appendf!(buf, "{:>3}", 7).unwrap();
/// assert_eq!(buf, "x =   7");
/// ```
#[macro_export]
macro_rules! appendf {
    ($buf:expr, $($arg:tt)*) => {
        $buf.append_formatted(::core::format_args!($($arg)*))
    };
}

/// Insert formatted text at the front of a [`TextBuffer`](crate::TextBuffer).
///
/// ```rust
/// use growbuf::{TextBuffer, prependf};
///
/// let mut buf = TextBuffer::from("warnings");
/// prependf!(buf, "{} ", 3).unwrap();
/// assert_eq!(buf, "3 warnings");
/// ```
#[macro_export]
macro_rules! prependf {
    ($buf:expr, $($arg:tt)*) => {
        $buf.prepend_formatted(::core::format_args!($($arg)*))
    };
}
