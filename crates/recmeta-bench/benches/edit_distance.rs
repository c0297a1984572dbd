//! Edit-distance matrix construction and merging.
#![allow(clippy::expect_used)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use recmeta_bench::{SizeTier, generate_library};
use recmeta_core::{EditDistanceMetric, EntrySet, Field, compute_distances};

fn bench_distances(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_distance");

    for (name, tier) in [
        ("S", SizeTier::Small),
        ("M", SizeTier::Medium),
        ("L", SizeTier::Large),
    ] {
        let library = generate_library(&tier.config(42));
        let titles = EntrySet::build(&library.records, Field::Title);
        let cells = (titles.len() * titles.len()) as u64;

        group.throughput(Throughput::Elements(cells));

        group.bench_with_input(BenchmarkId::new("matrix", name), &titles, |b, titles| {
            b.iter(|| black_box(compute_distances(titles)));
        });

        group.bench_with_input(BenchmarkId::new("merge", name), &titles, |b, titles| {
            let metrics = [
                (EditDistanceMetric::Absolute, 1),
                (EditDistanceMetric::Proportional, 20),
            ];
            b.iter(|| {
                let mut set = titles.clone();
                let merged = set.merge_by_edit_distance(&metrics).expect("matching sizes");
                black_box(merged)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_distances);
criterion_main!(benches);
