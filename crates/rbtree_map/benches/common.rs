use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_runtime_config_for, ascending_keys, lookup_keys, shuffled_keys, workload_rng};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;

use rbtree_map::{RbTree, RedBlackTree};

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const GET_HIT_RATE_PERCENT: u64 = 80;
const MIXED_PUT_PERCENT: u64 = 20;

/// The surface every benchmarked map shares.
pub trait BenchMap {
    fn with_capacity(capacity: usize) -> Self;
    fn put(&mut self, key: u64, value: u64);
    fn get(&self, key: u64) -> Option<u64>;
}

impl BenchMap for RbTree<u64, u64> {
    fn with_capacity(capacity: usize) -> Self {
        RbTree::with_capacity(capacity)
    }

    fn put(&mut self, key: u64, value: u64) {
        black_box(RbTree::put(self, key, value).ok());
    }

    fn get(&self, key: u64) -> Option<u64> {
        RbTree::get(self, &key).ok().copied()
    }
}

impl BenchMap for RedBlackTree<u64, u64> {
    fn with_capacity(capacity: usize) -> Self {
        RedBlackTree::with_capacity(capacity)
    }

    fn put(&mut self, key: u64, value: u64) {
        black_box(RedBlackTree::put(self, key, value).ok());
    }

    fn get(&self, key: u64) -> Option<u64> {
        RedBlackTree::get(self, &key).ok()
    }
}

impl BenchMap for BTreeMap<u64, u64> {
    fn with_capacity(_capacity: usize) -> Self {
        BTreeMap::new()
    }

    fn put(&mut self, key: u64, value: u64) {
        black_box(self.insert(key, value));
    }

    fn get(&self, key: u64) -> Option<u64> {
        BTreeMap::get(self, &key).copied()
    }
}

#[derive(Clone, Copy)]
enum Workload {
    Ascending,
    Shuffled,
}

fn build<M: BenchMap>(keys: &[u64]) -> M {
    let mut map = M::with_capacity(keys.len());
    for &k in keys {
        map.put(k, k);
    }
    map
}

fn bench_build<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str, workload: Workload)
where
    T: Measurement<Value = Duration>,
    M: BenchMap,
{
    for &size in &SIZES {
        apply_runtime_config_for(group, size);
        let keys = match workload {
            Workload::Ascending => ascending_keys(size),
            Workload::Shuffled => shuffled_keys(size, &mut workload_rng(1, size)),
        };

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let start = Instant::now();
                    let map = build::<M>(&keys);
                    total += start.elapsed();
                    drop(black_box(map));
                }
                total
            })
        });
    }
}

fn bench_get<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: BenchMap,
{
    for &size in &SIZES {
        apply_runtime_config_for(group, size);
        let mut rng = workload_rng(2, size);
        let map = build::<M>(&shuffled_keys(size, &mut rng));

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let probes = lookup_keys(OPS_PER_ITER, size, GET_HIT_RATE_PERCENT, &mut rng);
                    let start = Instant::now();
                    for &k in &probes {
                        black_box(map.get(k));
                    }
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

fn bench_mixed<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: BenchMap,
{
    for &size in &SIZES {
        apply_runtime_config_for(group, size);
        let mut rng = workload_rng(3, size);
        let mut map = build::<M>(&shuffled_keys(size, &mut rng));

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let probes = lookup_keys(OPS_PER_ITER, size, GET_HIT_RATE_PERCENT, &mut rng);
                    let puts: Vec<bool> = (0..OPS_PER_ITER)
                        .map(|_| rng.random_range(0..100) < MIXED_PUT_PERCENT)
                        .collect();
                    let start = Instant::now();
                    for (&k, &is_put) in probes.iter().zip(&puts) {
                        if is_put {
                            map.put(k, k ^ 1);
                        } else {
                            black_box(map.get(k));
                        }
                    }
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_all_build<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_build::<RbTree<u64, u64>, _>(group, "rb/ascending", Workload::Ascending);
    bench_build::<RbTree<u64, u64>, _>(group, "rb/shuffled", Workload::Shuffled);
    bench_build::<RedBlackTree<u64, u64>, _>(group, "locked_rb/shuffled", Workload::Shuffled);
    bench_build::<BTreeMap<u64, u64>, _>(group, "std_btree/ascending", Workload::Ascending);
    bench_build::<BTreeMap<u64, u64>, _>(group, "std_btree/shuffled", Workload::Shuffled);
}

pub fn bench_all_get<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_get::<RbTree<u64, u64>, _>(group, "rb");
    bench_get::<RedBlackTree<u64, u64>, _>(group, "locked_rb");
    bench_get::<BTreeMap<u64, u64>, _>(group, "std_btree");
}

pub fn bench_all_mixed<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_mixed::<RbTree<u64, u64>, _>(group, "rb");
    bench_mixed::<RedBlackTree<u64, u64>, _>(group, "locked_rb");
    bench_mixed::<BTreeMap<u64, u64>, _>(group, "std_btree");
}
