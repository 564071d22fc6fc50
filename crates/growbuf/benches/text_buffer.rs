//! Benchmark – `growbuf::TextBuffer` append, formatting and splitting
#![allow(missing_docs)]

use std::{fmt::Write as _, time::Duration};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use growbuf::{GrowthOptions, Sequence, TextBuffer, appendf};

/// A deterministic line of `words` space-separated words.
fn make_line(words: usize) -> String {
    let mut line = String::new();
    for idx in 0..words {
        if idx > 0 {
            line.push(' ');
        }
        write!(line, "word{idx}").unwrap();
    }
    line
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_append");
    for &factor in &[1.5f64, 2.0] {
        let options = GrowthOptions {
            growth_factor: factor,
            ..GrowthOptions::default()
        };
        group.bench_with_input(
            BenchmarkId::new("push_char", factor),
            &options,
            |b, &options| {
                b.iter(|| {
                    let mut buf = TextBuffer::with_options(options);
                    for byte in (0..10_000u32).map(|i| b'a' + (i % 26) as u8) {
                        buf.push_char(byte);
                    }
                    black_box(buf.len());
                });
            },
        );
    }
    group.bench_function("append_chunks", |b| {
        let chunk = make_line(16);
        b.iter(|| {
            let mut buf = TextBuffer::new();
            for _ in 0..100 {
                buf.append(black_box(&chunk));
            }
            black_box(buf.len());
        });
    });
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_format");
    group.bench_function("appendf", |b| {
        b.iter(|| {
            let mut buf = TextBuffer::new();
            for idx in 0..1_000 {
                appendf!(buf, "{idx}: {:>8.3}\n", f64::from(idx) / 7.0).unwrap();
            }
            black_box(buf.len());
        });
    });
    group.bench_function("fmt_write", |b| {
        b.iter(|| {
            let mut buf = TextBuffer::new();
            for idx in 0..1_000 {
                writeln!(buf, "{idx}: {:>8.3}", f64::from(idx) / 7.0).unwrap();
            }
            black_box(buf.len());
        });
    });
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_split");
    for &words in &[10usize, 100, 1_000] {
        let buf = TextBuffer::from(make_line(words).as_str());
        group.bench_with_input(BenchmarkId::new("split_by", words), &buf, |b, buf| {
            b.iter(|| black_box(buf.split_by(b' ')).len());
        });
        group.bench_with_input(BenchmarkId::new("split_by_many", words), &buf, |b, buf| {
            b.iter(|| black_box(buf.split_by_many(b" d")).len());
        });
    }
    group.bench_function("sequence_push", |b| {
        b.iter(|| {
            let mut seq = Sequence::new();
            for idx in 0..10_000u64 {
                seq.push(idx);
            }
            black_box(seq.len());
        });
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_append, bench_format, bench_split }
criterion_main!(benches);
