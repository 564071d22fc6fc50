//! Byte classification used by the trimming operations.

/// Whether `byte` is ASCII whitespace: space, `\t`, `\n`, `\r`, vertical tab
/// (`\x0B`) or form feed (`\x0C`).
///
/// This is wider than [`u8::is_ascii_whitespace`], which leaves out the
/// vertical tab.
#[inline]
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}
