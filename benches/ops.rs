//! Operation Benchmarks for tablekv
//!
//! Measures the hot paths - single-record save/get and prefix scans -
//! against a throwaway on-disk store.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde::{Deserialize, Serialize};
use tablekv::{EngineConfig, TableStore};

#[derive(Serialize, Deserialize)]
struct Payload {
    name: String,
    email: String,
    active: bool,
}

fn payload(i: u64) -> Payload {
    Payload {
        name: format!("user-{i}"),
        email: format!("user-{i}@example.com"),
        active: i % 2 == 0,
    }
}

fn bench_store() -> (TableStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = TableStore::open_with_config(EngineConfig::new(dir.path()).temporary(true)).unwrap();
    (store, dir)
}

/// Benchmark save operations
fn bench_save(c: &mut Criterion) {
    let (store, _dir) = bench_store();

    let mut group = c.benchmark_group("save");
    group.throughput(Throughput::Elements(1));

    group.bench_function("save_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store
                .save("bench", &format!("k{i}"), &payload(i), None)
                .unwrap();
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark get operations
fn bench_get(c: &mut Criterion) {
    let (store, _dir) = bench_store();

    for i in 0..1_000u64 {
        store
            .save("bench", &format!("k{i}"), &payload(i), None)
            .unwrap();
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let found: Payload = store.get("bench", &format!("k{}", i % 1_000)).unwrap();
            black_box(found);
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark prefix scans
fn bench_prefix_scan(c: &mut Criterion) {
    let (store, _dir) = bench_store();

    for i in 0..1_000u64 {
        store
            .save("bench", &format!("user{i:04}"), &payload(i), None)
            .unwrap();
    }

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("prefix_1000", |b| {
        b.iter(|| {
            let values: Vec<Payload> = store.query_by_prefix("bench", "user").unwrap();
            black_box(values.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_save, bench_get, bench_prefix_scan);
criterion_main!(benches);
