use std::io::{self, Read};

use super::{TextBuffer, TextParts};
use crate::raw::RawAlloc;

/// Bytes requested from the reader per call.
const CHUNK_SIZE: usize = 256;

/// Read `reader` to the end, handing each chunk to `sink`. Returns the number
/// of bytes read.
fn read_chunks(mut reader: impl Read, mut sink: impl FnMut(&[u8])) -> io::Result<usize> {
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut total = 0usize;
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(total),
            Ok(n) => {
                total += n;
                sink(&chunk[..n]);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

impl<A: RawAlloc> TextBuffer<A> {
    /// Append everything `reader` yields until end of input, reading in
    /// fixed-size chunks. Returns the number of bytes read.
    ///
    /// # Errors
    ///
    /// Returns the first non-`Interrupted` error from `reader`. Bytes read
    /// before the error stay appended.
    pub fn read_into(&mut self, reader: impl Read) -> io::Result<usize> {
        let total = read_chunks(reader, |chunk| self.append(chunk))?;
        tracing::debug!(bytes = total, "read into text buffer");
        Ok(total)
    }
}

/// Read `reader` to the end and push one owned view per line onto `lines`.
///
/// Lines are separated by `\n`, which is stripped; `\r` is kept. A final line
/// without a trailing `\n` is still pushed, and an input ending in `\n` does
/// not produce an extra empty line. Returns the number of bytes read.
///
/// ```rust
/// use growbuf::{Sequence, read_lines};
///
/// let mut lines = Sequence::new();
/// let read = read_lines(&mut lines, &b"first\nsecond"[..]).unwrap();
/// assert_eq!(read, 12);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1], "second");
/// ```
///
/// # Errors
///
/// Returns the first non-`Interrupted` error from `reader`. Lines completed
/// before the error stay in `lines`.
pub fn read_lines<A: RawAlloc>(lines: &mut TextParts<A>, reader: impl Read) -> io::Result<usize> {
    let mut pending = TextBuffer::with_options_in(*lines.options(), lines.allocator().clone());
    let before = lines.len();

    let total = read_chunks(reader, |chunk| {
        let mut pieces = chunk.split(|&b| b == b'\n');
        let mut current = pieces.next().unwrap_or_default();
        for next in pieces {
            pending.append(current);
            lines.push(pending.owned_view());
            pending.empty();
            current = next;
        }
        pending.append(current);
    })?;

    if !pending.is_empty() {
        lines.push(pending.owned_view());
    }
    tracing::debug!(bytes = total, lines = lines.len() - before, "read lines");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Read},
        string::ToString,
    };

    use super::read_lines;
    use crate::{Sequence, TextBuffer, View};

    /// Yields at most `step` bytes per call and interrupts every other call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_into_appends_everything() {
        let data: std::vec::Vec<u8> = (0..1000u32).map(|i| b'a' + (i % 26) as u8).collect();
        let mut buf = TextBuffer::from("> ");
        let read = buf.read_into(&data[..]).unwrap();
        assert_eq!(read, 1000);
        assert_eq!(&buf[2..], &data[..]);
        assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn read_into_retries_interrupts() {
        let mut buf = TextBuffer::new();
        let reader = Trickle {
            data: b"slow input",
            step: 3,
            interrupt: false,
        };
        assert_eq!(buf.read_into(reader).unwrap(), 10);
        assert_eq!(buf, "slow input");
    }

    #[test]
    fn read_into_reports_errors() {
        let mut buf = TextBuffer::new();
        let err = buf.read_into(Broken).unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn lines_survive_chunk_boundaries() {
        let mut lines = Sequence::new();
        let reader = Trickle {
            data: b"alpha\nbeta\n\ngamma",
            step: 4,
            interrupt: false,
        };
        assert_eq!(read_lines(&mut lines, reader).unwrap(), 17);
        let got: std::vec::Vec<&[u8]> = lines.iter().map(|line| line.as_bytes()).collect();
        assert_eq!(got, [&b"alpha"[..], b"beta", b"", b"gamma"]);
        assert!(lines.iter().all(|line| line.is_owned()));
    }

    #[test]
    fn lines_own_exactly_their_bytes() {
        let mut input = std::vec![b'x'; 1000];
        input.extend_from_slice(b"\nab\n");
        let mut lines = Sequence::new();
        read_lines(&mut lines, &input[..]).unwrap();
        let allocated: std::vec::Vec<usize> = lines
            .iter()
            .map(|line| match line.clone().into_view() {
                View::Owned(owned) => owned.allocated(),
                View::Borrowed(_) => 0,
            })
            .collect();
        assert_eq!(allocated, [1001, 3]);
    }

    #[test]
    fn trailing_newline_adds_no_empty_line() {
        let mut lines = Sequence::new();
        read_lines(&mut lines, &b"one\r\ntwo\n"[..]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one\r");
        assert_eq!(lines[1].as_bytes_with_nul(), Some(&b"two\0"[..]));
    }

    #[test]
    fn empty_input_reads_nothing() {
        let mut lines = Sequence::new();
        assert_eq!(read_lines(&mut lines, io::empty()).unwrap(), 0);
        assert!(lines.is_empty());
    }
}
