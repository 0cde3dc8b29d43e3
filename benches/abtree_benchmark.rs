// The benchmarks aim to only measure times of the operations in their names.
// That's why all use Bencher::iter_batched which enables non-benchmarked
// preparation before running the measured function.
// Every operation is timed twice, once against AbTree and once against
// std's BTreeMap as the baseline, over the same shuffled u64 keys.
// The key counts are chosen at random from constant ranges in an attempt to
// avoid a single count performing better because of specific HW features of
// computers the code is benchmarked with.

use abtree::{AbTree, AbTreeConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

// ranges of counts for the benchmarks (MINs are inclusive, MAXes exclusive):
const COUNT_MIN: usize = 4000;
const COUNT_MAX: usize = 5000;

fn shuffled_keys() -> Vec<u64> {
    let mut rng = rand::rng();
    let count = rng.random_range(COUNT_MIN..COUNT_MAX);
    let mut keys: Vec<u64> = (0..count as u64).collect();
    keys.shuffle(&mut rng);
    keys
}

fn filled_abtree(keys: &[u64], config: AbTreeConfig) -> AbTree<u64, u64> {
    let mut tree = AbTree::with_config(config);
    tree.extend(keys.iter().map(|k| (*k, *k)));
    tree
}

fn filled_btree(keys: &[u64]) -> BTreeMap<u64, u64> {
    keys.iter().map(|k| (*k, *k)).collect()
}

fn configs() -> Vec<(&'static str, AbTreeConfig)> {
    let mut out = vec![("default", AbTreeConfig::default())];
    for (name, a, b) in [("2_3", 2, 3), ("8_16", 8, 16)] {
        if let Ok(config) = AbTreeConfig::new(a, b) {
            out.push((name, config));
        }
    }
    out
}

pub fn insert(c: &mut Criterion) {
    for (name, config) in configs() {
        c.bench_function(&format!("abtree_insert_{}", name), |b| {
            b.iter_batched(
                shuffled_keys,
                |keys| {
                    let mut tree = AbTree::with_config(config);
                    for k in keys {
                        tree.replace(k, k);
                    }
                    tree
                },
                BatchSize::SmallInput,
            )
        });
    }
    c.bench_function("btreemap_insert", |b| {
        b.iter_batched(
            shuffled_keys,
            |keys| {
                let mut map = BTreeMap::new();
                for k in keys {
                    map.insert(k, k);
                }
                map
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn find(c: &mut Criterion) {
    for (name, config) in configs() {
        c.bench_function(&format!("abtree_find_{}", name), |b| {
            b.iter_batched(
                || {
                    let keys = shuffled_keys();
                    (filled_abtree(&keys, config), keys)
                },
                |(tree, keys)| {
                    for k in keys.iter() {
                        black_box(tree.get(k));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    c.bench_function("btreemap_find", |b| {
        b.iter_batched(
            || {
                let keys = shuffled_keys();
                (filled_btree(&keys), keys)
            },
            |(map, keys)| {
                for k in keys.iter() {
                    black_box(map.get(k));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn iterate(c: &mut Criterion) {
    for (name, config) in configs() {
        c.bench_function(&format!("abtree_iterate_{}", name), |b| {
            b.iter_batched(
                || filled_abtree(&shuffled_keys(), config),
                |tree| {
                    let mut cursor = tree.begin();
                    while let Some(v) = cursor.value() {
                        black_box(v);
                        cursor.move_next();
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    c.bench_function("btreemap_iterate", |b| {
        b.iter_batched(
            || filled_btree(&shuffled_keys()),
            |map| {
                for v in map.values() {
                    black_box(v);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn erase(c: &mut Criterion) {
    for (name, config) in configs() {
        c.bench_function(&format!("abtree_erase_{}", name), |b| {
            b.iter_batched(
                || {
                    let mut keys = shuffled_keys();
                    let tree = filled_abtree(&keys, config);
                    keys.shuffle(&mut rand::rng());
                    (tree, keys)
                },
                |(mut tree, keys)| {
                    for k in keys.iter() {
                        black_box(tree.erase(k));
                    }
                    tree
                },
                BatchSize::SmallInput,
            )
        });
    }
    c.bench_function("btreemap_erase", |b| {
        b.iter_batched(
            || {
                let mut keys = shuffled_keys();
                let map = filled_btree(&keys);
                keys.shuffle(&mut rand::rng());
                (map, keys)
            },
            |(mut map, keys)| {
                for k in keys.iter() {
                    black_box(map.remove(k));
                }
                map
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, insert, find, iterate, erase);
criterion_main!(benches);
