//! Performance benchmarks for index construction.
//!
//! These measure `Engine::build` throughput across the corpus sizes named
//! in spec.md §4.7's cutover thresholds (1k, 10k, 50k, 100k identifiers),
//! where the engine is expected to switch from the hash index to the
//! inverted index plus Bloom filter and BM25 stats.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fuzzy_engine::{BuildOptions, Engine, EngineConfig, Item};

fn synthetic_identifiers(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| Item::text(format!("identifier{}_token{}", i, i % 997)))
        .collect()
}

fn bench_build_hash_backend(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_hash_backend");
    for &size in &[100usize, 1_000, 5_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("items", size), &size, |b, &size| {
            let items = synthetic_identifiers(size);
            b.iter(|| {
                let engine =
                    Engine::build(black_box(items.clone()), EngineConfig::fast(), BuildOptions::default()).unwrap();
                black_box(engine)
            })
        });
    }
    group.finish();
}

fn bench_build_inverted_backend(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_inverted_backend");
    for &size in &[1_000usize, 10_000, 50_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("items", size), &size, |b, &size| {
            let items = synthetic_identifiers(size);
            b.iter(|| {
                let engine = Engine::build(
                    black_box(items.clone()),
                    EngineConfig::comprehensive(),
                    BuildOptions::default(),
                )
                .unwrap();
                black_box(engine)
            })
        });
    }
    group.finish();
}

fn bench_incremental_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_add");
    for &base_size in &[1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::new("base_items", base_size), &base_size, |b, &base_size| {
            let base = synthetic_identifiers(base_size);
            b.iter_batched(
                || Engine::build(base.clone(), EngineConfig::balanced(), BuildOptions::default()).unwrap(),
                |mut engine| {
                    engine.add(vec![Item::text("freshly_added_identifier")]).unwrap();
                    black_box(engine)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_record_mode_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_mode_build");
    for &size in &[1_000usize, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("items", size), &size, |b, &size| {
            let items: Vec<Item> = (0..size)
                .map(|i| {
                    Item::record([
                        ("name".to_string(), format!("Product {i}")),
                        ("description".to_string(), format!("A widget numbered {i} with extra detail")),
                    ])
                })
                .collect();
            let mut options = BuildOptions::default();
            options.fields = vec!["name".to_string(), "description".to_string()];
            options.field_weights.insert("name".to_string(), 2.0);
            options.field_weights.insert("description".to_string(), 1.0);

            b.iter(|| {
                let engine =
                    Engine::build(black_box(items.clone()), EngineConfig::balanced(), options.clone()).unwrap();
                black_box(engine)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_hash_backend,
    bench_build_inverted_backend,
    bench_incremental_add,
    bench_record_mode_build
);
criterion_main!(benches);
