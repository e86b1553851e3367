//! Benchmarks for Range header parsing and id encoding on the streaming
//! hot path.

use carmine::streaming::parse_range;
use carmine_common::MediaId;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;

fn bench_parse_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_range");
    let size = 4 * 1024 * 1024 * 1024u64;

    for (label, header) in [
        ("closed", "bytes=1048576-2097151"),
        ("open_ended", "bytes=1048576-"),
        ("suffix", "bytes=-65536"),
        ("multi", "bytes=0-99, 200-299, 400-499"),
        ("malformed", "bytes=abc-def"),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| black_box(parse_range(black_box(header), size)))
        });
    }

    group.finish();
}

fn bench_media_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("media_id");
    let path = Path::new("/srv/media/videos/Some Show/Season 01/Some Show - S01E01 - Pilot.mkv");
    let id = MediaId::from_path(path);

    group.bench_function("encode", |b| {
        b.iter(|| black_box(MediaId::from_path(black_box(path))))
    });
    group.bench_function("decode", |b| b.iter(|| black_box(id.decode())));
    group.bench_function("parse_and_resolve", |b| {
        b.iter(|| {
            let parsed: MediaId = black_box(id.as_str()).parse().unwrap();
            black_box(parsed.resolve())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse_range, bench_media_id);
criterion_main!(benches);
