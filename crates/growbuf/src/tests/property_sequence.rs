use alloc::{collections::VecDeque, vec::Vec};

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use super::arbitrary::SeqOp;
use crate::Sequence;

/// Property: pushing a run of values and popping them back yields the run in
/// reverse, and the sequence ends empty with its allocation intact.
#[test]
fn push_pop_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(values: Vec<u32>) -> bool {
        let mut seq = Sequence::new();
        for &value in &values {
            seq.push(value);
        }
        if seq.as_slice() != values.as_slice() || seq.capacity() < values.len() {
            return false;
        }
        let cap = seq.capacity();

        let mut popped = Vec::new();
        while let Some(value) = seq.pop_opt() {
            popped.push(value);
        }
        popped.reverse();
        popped == values && seq.is_empty() && seq.capacity() == cap
    }

    #[cfg(not(any(miri, feature = "test-fast")))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(any(miri, feature = "test-fast"))]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Vec<u32>) -> bool);
}

/// Property: arbitrary head/tail operations agree with a `VecDeque` model,
/// and capacity never drops below the length or shrinks.
#[test]
fn sequence_ops_match_model_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(ops: Vec<SeqOp>) -> bool {
        let mut seq = Sequence::new();
        let mut model = VecDeque::new();
        let mut cap = 0;
        for op in ops {
            let agrees = match op {
                SeqOp::Push(value) => {
                    seq.push(value);
                    model.push_back(value);
                    true
                }
                SeqOp::Unshift(value) => {
                    seq.unshift(value);
                    model.push_front(value);
                    true
                }
                SeqOp::Pop => seq.pop_opt() == model.pop_back(),
                SeqOp::Shift => seq.shift_opt() == model.pop_front(),
                SeqOp::Empty => {
                    seq.empty();
                    model.clear();
                    true
                }
                SeqOp::EnsureCapacity(min) => {
                    seq.ensure_capacity(min);
                    seq.capacity() >= min
                }
            };
            if !agrees || !seq.iter().eq(model.iter()) {
                return false;
            }
            if seq.capacity() < seq.len() || seq.capacity() < cap {
                return false;
            }
            cap = seq.capacity();
        }
        true
    }

    #[cfg(not(any(miri, feature = "test-fast")))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(any(miri, feature = "test-fast"))]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Vec<SeqOp>) -> bool);
}

/// Property: every owned view is a disjoint copy; every range view aliases
/// the source.
#[test]
fn views_alias_or_copy_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(values: Vec<u8>, start: usize, end: usize) -> bool {
        let seq = Sequence::from_slice(&values);
        let owned = seq.owned_view();
        if !owned.is_owned() || owned.as_slice() != values.as_slice() {
            return false;
        }
        if !values.is_empty() && owned.as_slice().as_ptr() == seq.as_slice().as_ptr() {
            return false;
        }

        let len = values.len();
        let (start, end) = (start % (len + 2), end % (len + 2));
        let range = seq.range_view(start, end);
        if start < end && end <= len {
            range.as_slice() == &values[start..end]
                && range.as_slice().as_ptr() == seq.as_slice()[start..].as_ptr()
        } else {
            range.is_empty()
        }
    }

    #[cfg(not(any(miri, feature = "test-fast")))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(any(miri, feature = "test-fast"))]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Vec<u8>, usize, usize) -> bool);
}

/// Unshifting every value yields them in reverse; shifting drains them back
/// in that order.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn unshift_reverses_and_shift_restores(values: Vec<u16>) -> bool {
    let mut seq = Sequence::new();
    for &value in &values {
        seq.unshift(value);
    }
    let reversed: Vec<u16> = values.iter().rev().copied().collect();
    if seq.as_slice() != reversed.as_slice() {
        return false;
    }
    let mut shifted = Vec::new();
    while let Some(value) = seq.shift_opt() {
        shifted.push(value);
    }
    shifted == reversed && seq.is_empty()
}

/// Cloned items hold exactly the live elements, never the spare capacity.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn clone_items_is_exact(values: Vec<u8>, extra: u8) -> bool {
    let mut seq = Sequence::from_slice(&values);
    seq.ensure_capacity(values.len() + usize::from(extra));
    let items = seq.clone_items();
    items.as_slice() == values.as_slice() && items.allocated() == values.len()
}
