use std::hash::Hash;
use std::collections::BTreeMap;

use rand::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
// Measuring the map, not the hasher
use fnv::FnvHashMap as HashMap;

use avl_containers::AvlMap;

trait Map<K, V>: Default {
    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Inserts or overwrites the value for `key`
    fn upsert(&mut self, key: K, value: V);

    fn remove(&mut self, key: &K) -> Option<V>;
}

macro_rules! impl_std_map {
    ($name:ident, $bound:ident $(+ $other_bound:ident)*) => {
        impl<K, V> Map<K, V> for $name<K, V>
            where K: $bound $(+ $other_bound)*,
        {
            fn get_mut(&mut self, key: &K) -> Option<&mut V> {
                $name::get_mut(self, key)
            }

            fn upsert(&mut self, key: K, value: V) {
                black_box($name::insert(self, key, value));
            }

            fn remove(&mut self, key: &K) -> Option<V> {
                $name::remove(self, key)
            }
        }
    };
}

impl_std_map!(HashMap, Hash + Eq);
impl_std_map!(BTreeMap, Ord);

impl<K: Ord, V> Map<K, V> for AvlMap<K, V> {
    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        AvlMap::get_mut(self, key)
    }

    fn upsert(&mut self, key: K, value: V) {
        black_box(AvlMap::insert_or_assign(self, key, value));
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        AvlMap::remove(self, key)
    }
}

/// Word-like keys drawn from a small alphabet, so many of them repeat
fn make_keys(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(count as u64);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=4);
            (0..len).map(|_| rng.gen_range(b'a'..=b'h') as char).collect()
        })
        .collect()
}

/// Counts how often each key occurs
fn word_count<M: Map<String, usize>>(keys: &[String]) -> M {
    let mut map = M::default();
    for key in keys {
        match map.get_mut(key) {
            Some(count) => *count += 1,
            None => map.upsert(key.clone(), 1),
        }
    }
    map
}

/// Scatters consecutive steps so insertion order is not sorted order
fn scatter(step: u64) -> u64 {
    step.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40
}

/// Inserts a key per step and removes the one inserted `WINDOW` steps earlier
fn sliding_window<M: Map<u64, u64>>(steps: u64) -> M {
    const WINDOW: u64 = 64;

    let mut map = M::default();
    for step in 0..steps {
        map.upsert(scatter(step), step);

        if step >= WINDOW {
            black_box(map.remove(&scatter(step - WINDOW)));
        }
    }
    map
}

const SIZES: &[usize] = &[100, 1000, 10_000];

pub fn bench_word_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("word count");
    for &size in SIZES {
        let keys = make_keys(size);
        group.bench_with_input(BenchmarkId::new("HashMap", size), &keys, |b, keys| {
            b.iter(|| word_count::<HashMap<String, usize>>(keys))
        });
        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| word_count::<BTreeMap<String, usize>>(keys))
        });
        group.bench_with_input(BenchmarkId::new("AvlMap", size), &keys, |b, keys| {
            b.iter(|| word_count::<AvlMap<String, usize>>(keys))
        });
    }
    group.finish();
}

pub fn bench_sliding_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("sliding window");
    for &size in SIZES {
        let steps = size as u64;
        group.bench_with_input(BenchmarkId::new("HashMap", size), &steps, |b, &steps| {
            b.iter(|| sliding_window::<HashMap<u64, u64>>(steps))
        });
        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &steps, |b, &steps| {
            b.iter(|| sliding_window::<BTreeMap<u64, u64>>(steps))
        });
        group.bench_with_input(BenchmarkId::new("AvlMap", size), &steps, |b, &steps| {
            b.iter(|| sliding_window::<AvlMap<u64, u64>>(steps))
        });
    }
    group.finish();
}

pub fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &size in SIZES {
        let left: Vec<(u32, u32)> = (0..size as u32).map(|i| (i * 2, i)).collect();
        let right: Vec<(u32, u32)> = (0..size as u32).map(|i| (i * 3, i)).collect();

        group.bench_function(BenchmarkId::new("BTreeMap", size), |b| {
            b.iter(|| {
                let mut map: BTreeMap<_, _> = left.iter().copied().collect();
                let other: BTreeMap<_, _> = right.iter().copied().collect();
                // Existing entries win, as in `AvlMap::merge`
                for (key, value) in other {
                    map.entry(key).or_insert(value);
                }
                map.len()
            })
        });
        group.bench_function(BenchmarkId::new("AvlMap", size), |b| {
            b.iter(|| {
                let mut map: AvlMap<_, _> = left.iter().copied().collect();
                let mut other: AvlMap<_, _> = right.iter().copied().collect();
                map.merge(&mut other);
                map.len()
            })
        });
    }
    group.finish();
}

criterion_group!(benches,
    bench_word_count,
    bench_sliding_window,
    bench_merge,
);

criterion_main!(benches);
