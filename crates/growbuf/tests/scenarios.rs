#![allow(missing_docs)]

use std::fmt::Write as _;

use growbuf::{GrowthOptions, Sequence, TextBuffer, TextParts, appendf, prependf};
use rstest::rstest;

fn render(parts: &TextParts) -> String {
    let mut out = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        write!(out, "{idx}: {part:?} len={}", part.len()).unwrap();
    }
    out
}

#[test]
fn range_view_over_sequence() {
    let seq = Sequence::from_slice(&[1, 2, 3, 4, 5]);
    let view = seq.range_view(2, 4);
    assert_eq!(view.as_slice(), &[3, 4]);
    assert_eq!(view.len(), 2);
    assert!(!view.is_owned());
    assert_eq!(seq.as_slice(), &[1, 2, 3, 4, 5]);
}

#[test]
fn build_bracketed_text() {
    let mut buf = TextBuffer::new();
    buf.push_char(b'[');
    buf.append("foobar");
    buf.push_char(b']');
    insta::assert_snapshot!(buf, @"[foobar]");
    assert_eq!(buf.len(), 8);
}

#[test]
fn formatted_append_on_empty_buffer() {
    let mut buf = TextBuffer::new();
    appendf!(buf, "NUMBER: {}", 4).unwrap();
    insta::assert_snapshot!(buf, @"NUMBER: 4");
    assert_eq!(buf.len(), 9);
    assert_eq!(buf.as_c_str().unwrap(), c"NUMBER: 4");
}

#[test]
fn formatted_prepend_then_append() {
    let mut buf = TextBuffer::from("body");
    prependf!(buf, "<{}>", "head").unwrap();
    appendf!(buf, "</{}>", "head").unwrap();
    insta::assert_snapshot!(buf, @"<head>body</head>");
}

#[test]
fn split_on_spaces_leaves_source_alone() {
    let buf = TextBuffer::from("foo bar baz");
    let before = (buf.as_ptr(), buf.capacity(), buf.len());
    let parts = buf.split_by(b' ');
    insta::assert_snapshot!(render(&parts), @r#"
    0: Owned("foo") len=3
    1: Owned("bar") len=3
    2: Owned("baz") len=3
    "#);
    assert_eq!((buf.as_ptr(), buf.capacity(), buf.len()), before);
}

#[test]
fn split_family_debug_output() {
    let buf = TextBuffer::from("a=b=c");
    insta::assert_snapshot!(format!("{:?}", buf.split_by_once(b'=')), @r#"[Owned("a"), Owned("b=c")]"#);
    insta::assert_snapshot!(format!("{:?}", buf.split_by_once(b'#')), @r#"[Owned("a=b=c"), Owned("")]"#);
    insta::assert_snapshot!(format!("{:?}", buf.split_at(1)), @r#"[Owned("a"), Owned("=b=c")]"#);
    insta::assert_snapshot!(format!("{:?}", buf.split_by_many(b"=b")), @r#"[Owned("a"), Owned(""), Owned(""), Owned("c")]"#);
}

#[test]
fn remove_ranges_step_by_step() {
    let mut buf = TextBuffer::from("xxfoobarxxxxx");
    buf.remove_range(0, 2);
    assert_eq!(buf, "foobarxxxxx");
    assert_eq!(buf.len(), 11);
    buf.remove_range(6, 11);
    assert_eq!(buf, "foobar");
    assert_eq!(buf.len(), 6);
    assert_eq!(buf.as_bytes_with_nul(), b"foobar\0");
}

#[test]
fn pop_on_empty_differs_from_pop_opt() {
    let mut buf = TextBuffer::new();
    assert_eq!(buf.pop_char_opt(), None);

    let panicked = std::panic::catch_unwind(move || buf.pop_char()).unwrap_err();
    let message = panicked
        .downcast_ref::<&str>()
        .copied()
        .map(String::from)
        .or_else(|| panicked.downcast_ref::<String>().cloned())
        .unwrap();
    insta::assert_snapshot!(message, @"String failed to pop, expected length of >= 1, but got length of 0");
}

#[rstest]
#[case("  both  ", "both")]
#[case("\t\x0B\x0Cleading", "leading")]
#[case("trailing\r\n", "trailing")]
#[case(" \n ", "")]
#[case("", "")]
#[case("in side", "in side")]
fn trim_strips_ascii_whitespace(#[case] input: &str, #[case] expected: &str) {
    let mut buf = TextBuffer::from(input);
    let view_trimmed = buf.as_view().trimmed().as_bytes().to_vec();
    buf.trim();
    assert_eq!(buf, expected);
    assert_eq!(view_trimmed, expected.as_bytes());
    assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
}

#[rstest]
#[case(0, 3, "def")]
#[case(3, 6, "abc")]
#[case(1, 2, "acdef")]
#[case(2, 2, "abcdef")]
#[case(4, 2, "abcdef")]
#[case(0, 7, "abcdef")]
#[case(6, 7, "abcdef")]
fn remove_range_cases(#[case] start: usize, #[case] end: usize, #[case] expected: &str) {
    let mut buf = TextBuffer::from("abcdef");
    buf.remove_range(start, end);
    assert_eq!(buf, expected);
}

#[rstest]
#[case(GrowthOptions::default(), &[10, 16, 16, 25])]
#[case(GrowthOptions { start_capacity: 2, growth_factor: 2.0 }, &[2, 22, 22, 22])]
fn growth_follows_options(#[case] options: GrowthOptions, #[case] expected: &[usize]) {
    let mut seq = Sequence::<u8>::with_options(options);
    let mut seen = Vec::new();
    for min in [1, 11, 16, 17] {
        seq.ensure_capacity(min);
        seen.push(seq.capacity());
    }
    assert_eq!(seen, expected);

    // an already-satisfied request is a no-op
    seq.ensure_capacity(1);
    assert_eq!(Some(&seq.capacity()), expected.last());
}

#[test]
fn owned_views_outlive_their_source() {
    let parts = {
        let buf = TextBuffer::from("one two");
        buf.split_by(b' ')
    };
    assert_eq!(parts[0], "one");
    assert_eq!(parts[1].as_c_str(), Some(c"two"));

    let drained = {
        let mut buf = TextBuffer::from("moved");
        buf.drain()
    };
    assert_eq!(drained.to_string(), "moved");
}
