#![no_main]

use arbitrary::Arbitrary;
use growbuf::{GrowthOptions, TextBuffer, ascii::is_whitespace};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Push(u8),
    Unshift(u8),
    Append(Vec<u8>),
    Prepend(Vec<u8>),
    Pop,
    Shift,
    Remove(u8),
    RemoveRange(u8, u8),
    DrainRange(u8, u8),
    Drain,
    Trim,
    Empty,
    Free,
    Ensure(u8),
    Format(u16),
    PrependFormat(u16),
    Split(u8),
    SplitMany(Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    start_capacity: u8,
    growth_tenths: u8,
    ops: Vec<Op>,
}

fn check(buf: &TextBuffer, model: &[u8]) {
    assert_eq!(buf.as_bytes(), model);
    let with_nul = buf.as_bytes_with_nul();
    assert_eq!(with_nul.len(), model.len() + 1);
    assert_eq!(with_nul[model.len()], 0);
    assert!(buf.capacity() >= buf.len());
}

fuzz_target!(|input: Input| {
    let options = GrowthOptions {
        start_capacity: usize::from(input.start_capacity),
        growth_factor: f64::from(input.growth_tenths) / 10.0,
    };
    let mut buf = TextBuffer::with_options(options);
    let mut model: Vec<u8> = Vec::new();

    for op in input.ops {
        match op {
            Op::Push(b) => {
                buf.push_char(b);
                model.push(b);
            }
            Op::Unshift(b) => {
                buf.unshift_char(b);
                model.insert(0, b);
            }
            Op::Append(bytes) => {
                buf.append(&bytes);
                model.extend_from_slice(&bytes);
            }
            Op::Prepend(bytes) => {
                buf.prepend(&bytes);
                model.splice(0..0, bytes);
            }
            Op::Pop => assert_eq!(buf.pop_char_opt(), model.pop()),
            Op::Shift => {
                let expected = (!model.is_empty()).then(|| model.remove(0));
                assert_eq!(buf.shift_char_opt(), expected);
            }
            Op::Remove(idx) => {
                let idx = usize::from(idx);
                buf.remove(idx);
                if idx < model.len() {
                    model.remove(idx);
                }
            }
            Op::RemoveRange(start, end) | Op::DrainRange(start, end) => {
                let (start, end) = (usize::from(start), usize::from(end));
                let valid = start < model.len() && end <= model.len() && start < end;
                let expected: Vec<u8> = if valid {
                    model.drain(start..end).collect()
                } else {
                    Vec::new()
                };
                if matches!(op, Op::DrainRange(..)) {
                    let view = buf.drain_range(start, end);
                    assert_eq!(view.as_bytes(), expected.as_slice());
                } else {
                    buf.remove_range(start, end);
                }
            }
            Op::Drain => {
                let view = buf.drain();
                assert_eq!(view.as_bytes(), model.as_slice());
                model.clear();
                assert_eq!(buf.capacity(), 0);
            }
            Op::Trim => {
                buf.trim();
                while model.last().copied().is_some_and(is_whitespace) {
                    model.pop();
                }
                let start = model.iter().position(|&b| !is_whitespace(b)).unwrap_or(model.len());
                model.drain(..start);
            }
            Op::Empty => {
                buf.empty();
                model.clear();
            }
            Op::Free => {
                buf.free();
                model.clear();
            }
            Op::Ensure(min) => {
                buf.ensure_capacity(usize::from(min));
                assert!(buf.capacity() >= usize::from(min));
            }
            Op::Format(n) => {
                growbuf::appendf!(buf, "<{n}>").unwrap();
                model.extend_from_slice(format!("<{n}>").as_bytes());
            }
            Op::PrependFormat(n) => {
                growbuf::prependf!(buf, "{n:x}|").unwrap();
                model.splice(0..0, format!("{n:x}|").into_bytes());
            }
            Op::SplitMany(delimiters) => {
                let parts = buf.split_by_many(&delimiters);
                let expected: Vec<&[u8]> = model.split(|b| delimiters.contains(b)).collect();
                assert_eq!(parts.len(), expected.len());
                for (part, want) in parts.iter().zip(expected) {
                    assert_eq!(part.as_bytes(), want);
                    assert_eq!(part.as_bytes_with_nul().and_then(|b| b.last()), Some(&0));
                }
            }
            Op::Split(delimiter) => {
                let parts = buf.split_by(delimiter);
                let joined = parts
                    .iter()
                    .map(|part| part.as_bytes())
                    .collect::<Vec<_>>()
                    .join(&delimiter);
                assert_eq!(joined, model);
            }
        }
        check(&buf, &model);
    }
});
