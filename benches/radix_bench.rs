//! Benchmarks for the radix tree against the std maps
//!
//! Run with:
//! ```bash
//! cargo bench --bench radix_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use radix_index::{RadixTree, TreeConfig};
use std::collections::{BTreeMap, HashMap};

/// Sequential keys sharing long prefixes
fn sequential_keys(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("seq_key_{:08}", i).into_bytes())
        .collect()
}

/// URL-like keys with a handful of shared hosts
fn url_keys(count: usize) -> Vec<Vec<u8>> {
    let hosts = ["example.com", "example.org", "rust-lang.org", "crates.io"];
    (0..count)
        .map(|i| format!("https://{}/path/{}/item{}", hosts[i % hosts.len()], i % 97, i).into_bytes())
        .collect()
}

fn release_config() -> TreeConfig {
    TreeConfig {
        verify_mutations: false,
        ..TreeConfig::default()
    }
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in [1_000, 10_000] {
        let keys = url_keys(size);

        group.bench_with_input(BenchmarkId::new("radix", size), &keys, |b, keys| {
            b.iter_batched(
                || RadixTree::with_config(release_config()),
                |mut tree| {
                    for (i, k) in keys.iter().enumerate() {
                        tree.add(k, i).unwrap();
                    }
                    tree
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("btreemap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for (i, k) in keys.iter().enumerate() {
                    map.insert(k.clone(), i);
                }
                map
            })
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let keys = sequential_keys(10_000);

    let mut tree = RadixTree::with_config(release_config());
    let mut map = HashMap::new();
    for (i, k) in keys.iter().enumerate() {
        tree.add(k, i).unwrap();
        map.insert(k.clone(), i);
    }

    group.bench_function("radix", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(tree.search(k).found);
            }
        })
    });
    group.bench_function("hashmap", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(map.contains_key(k));
            }
        })
    });
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let keys = url_keys(5_000);
    c.bench_function("delete/radix", |b| {
        b.iter_batched(
            || {
                let mut tree = RadixTree::with_config(release_config());
                for (i, k) in keys.iter().enumerate() {
                    tree.add(k, i).unwrap();
                }
                tree
            },
            |mut tree| {
                for k in &keys {
                    tree.delete(k).unwrap();
                }
                tree
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_insert, bench_search, bench_delete);
criterion_main!(benches);
