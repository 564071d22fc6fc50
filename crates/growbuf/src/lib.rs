//! Growable buffers with explicit growth and ownership rules.
//!
//! - [`Sequence`]: a growable run of `T` with a configurable growth policy
//!   ([`GrowthOptions`]).
//! - [`View`]: a run of `T` that either borrows from a buffer or owns a copy.
//! - [`TextBuffer`]: a growable byte string that always keeps a `0` byte after
//!   its contents, with formatted append/prepend, trimming, splitting and
//!   draining.
//! - [`TextView`]: the byte-string flavour of [`View`].
//!
//! All storage goes through a [`RawAlloc`] adapter ([`Global`] by default).
//! Allocation failure is fatal on the ordinary growing paths: it is reported
//! through `tracing` at `ERROR` level and then aborts via
//! [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
//! [`Sequence::try_ensure_capacity`] and [`TextBuffer::try_ensure_capacity`]
//! report it as an [`AllocError`] instead.
//!
//! Borrowing views hold a shared borrow of their source, so anything that
//! could reallocate the source is rejected while they are alive.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod ascii;
mod error;
mod options;
mod raw;
mod sequence;
mod text;
mod view;

#[cfg(test)]
mod tests;

pub use error::AllocError;
pub use options::GrowthOptions;
pub use raw::{Global, RawAlloc};
pub use sequence::Sequence;
#[cfg(feature = "std")]
pub use text::read_lines;
pub use text::{TextBuffer, TextParts, TextView};
pub use view::{OwnedSlice, View};
