//! Criterion benchmarks for the aggregation pipeline

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use revtrack::report::{initialize, JsonReport, ReportOptions};
use revtrack::services::{Aggregator, GroupOptions, ReviewStore, SnapshotLoader, TimeSeriesBuilder};
use revtrack::types::ReviewRecord;
use std::hint::black_box;
use std::path::PathBuf;

const PUBLISHERS: [&str; 10] = [
    "Google",
    "Yelp",
    "Facebook",
    "Ezcater",
    "OpenTable",
    "DoorDash",
    "GrubHub",
    "TripAdvisor",
    "UberEats",
    "Foursquare",
];

/// Synthetic snapshot spread over a year of days and 50 locations
fn synthetic_snapshot(count: usize) -> Vec<ReviewRecord> {
    (0..count)
        .map(|i| {
            let day = i % 365;
            let date = format!(
                "2025-{:02}-{:02}T00:00:00.000Z",
                day / 28 % 12 + 1,
                day % 28 + 1
            );
            ReviewRecord::new(PUBLISHERS[i % PUBLISHERS.len()], date)
                .with_rating((i % 5 + 1) as f64)
                .with_location((i % 50) as i64)
        })
        .collect()
}

fn bench_group_by_publisher(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    for size in [1_000, 10_000, 100_000] {
        let records = synthetic_snapshot(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("group_raw", size), &records, |b, r| {
            b.iter(|| Aggregator::group_by_publisher(black_box(r), &GroupOptions::raw()));
        });

        group.bench_with_input(
            BenchmarkId::new("group_formatted", size),
            &records,
            |b, r| {
                b.iter(|| Aggregator::group_by_publisher(black_box(r), &GroupOptions::default()));
            },
        );
    }

    group.finish();
}

fn bench_series(c: &mut Criterion) {
    let records = synthetic_snapshot(10_000);
    let groups = Aggregator::group_by_publisher(&records, &GroupOptions::raw());
    let views = Aggregator::to_publisher_views(&records, &GroupOptions::default());
    let axis = TimeSeriesBuilder::build_axis(&groups);

    let mut group = c.benchmark_group("timeseries");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("build_axis", |b| {
        b.iter(|| TimeSeriesBuilder::build_axis(black_box(&groups)));
    });

    group.bench_function("publisher_series", |b| {
        b.iter(|| TimeSeriesBuilder::publisher_series(black_box(&groups), &axis, &views));
    });

    group.bench_function("premise_series", |b| {
        b.iter(|| TimeSeriesBuilder::premise_series(black_box(&groups), &axis, &views));
    });

    group.finish();
}

fn bench_full_report(c: &mut Criterion) {
    let records = synthetic_snapshot(10_000);

    let mut group = c.benchmark_group("report");
    group.sample_size(20);

    group.bench_function("initialize_json", |b| {
        b.iter(|| {
            let mut store = ReviewStore::new();
            let mut report = JsonReport::new();
            initialize(
                &mut store,
                black_box(records.clone()),
                &mut report,
                &ReportOptions::default(),
            );
            report
        });
    });

    group.finish();
}

fn bench_parse_fixture(c: &mut Criterion) {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("snapshot.json");

    let Ok(text) = std::fs::read_to_string(&fixture) else {
        eprintln!("Skipping parse_fixture: {} not found", fixture.display());
        return;
    };

    let mut group = c.benchmark_group("loader");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("parse_document", |b| {
        b.iter(|| SnapshotLoader::parse_document(black_box(&text)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_group_by_publisher,
    bench_series,
    bench_full_report,
    bench_parse_fixture
);
criterion_main!(benches);
