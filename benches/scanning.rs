//! Benchmarks for walking a media tree.

use carmine::scanner::{scan_directory, sort_for_collection};
use carmine_common::MediaKind;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::fs;
use std::path::Path;

/// Build `dirs` folders of `per_dir` mixed files, plus a hidden folder the
/// scanner must skip.
fn populate(root: &Path, dirs: usize, per_dir: usize) -> usize {
    let mut media = 0;
    for d in 0..dirs {
        let dir = root.join(format!("Folder {d}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..per_dir {
            let name = match f % 4 {
                0 => format!("clip {f}.mp4"),
                1 => format!("track {f}.flac"),
                2 => format!("photo {f}.jpg"),
                _ => format!("notes {f}.txt"),
            };
            fs::write(dir.join(&name), b"x").unwrap();
            if f % 4 != 3 {
                media += 1;
            }
        }
    }
    let hidden = root.join(".cache");
    fs::create_dir_all(&hidden).unwrap();
    for f in 0..per_dir {
        fs::write(hidden.join(format!("{f}.mp4")), b"x").unwrap();
    }
    media
}

fn bench_scan(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let media = populate(&root, 50, 40);

    let mut group = c.benchmark_group("scan_directory");
    group.throughput(Throughput::Elements(media as u64));

    group.bench_function("all_kinds", |b| {
        b.iter(|| {
            let records = scan_directory(&root, None);
            assert_eq!(records.len(), media);
            records
        })
    });

    group.bench_function("videos_sorted", |b| {
        b.iter(|| {
            let mut records = scan_directory(&root, Some(MediaKind::Video));
            sort_for_collection(&mut records, MediaKind::Video);
            records
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
