//! Shared helpers for the criterion benches: runtime profiles and seeded key
//! workloads.

use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 800;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1500;
const RNG_SEED: u64 = 0x5EED_2026;
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

/// Picks a runtime profile from the workload size.
pub fn apply_runtime_config_for<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, size: usize) {
    match size {
        0..=10_000 => apply_small_runtime_config(group),
        10_001..=100_000 => apply_medium_runtime_config(group),
        _ => apply_large_runtime_config(group),
    }
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Deterministic per-workload RNG.
pub fn workload_rng(workload_id: u64, size: usize) -> StdRng {
    StdRng::seed_from_u64(mix_seed(RNG_SEED ^ (workload_id << 48) ^ size as u64))
}

/// `0..n` in ascending order, the worst case for an unbalanced BST.
pub fn ascending_keys(n: usize) -> Vec<u64> {
    (0..n as u64).collect()
}

/// A permutation of `0..n`.
pub fn shuffled_keys<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u64> {
    let mut keys = ascending_keys(n);
    keys.shuffle(rng);
    keys
}

/// `n` lookup keys of which roughly `hit_percent` fall inside `0..present`.
pub fn lookup_keys<R: Rng + ?Sized>(n: usize, present: usize, hit_percent: u64, rng: &mut R) -> Vec<u64> {
    (0..n)
        .map(|_| {
            if present > 0 && rng.random_range(0..100) < hit_percent {
                rng.random_range(0..present as u64)
            } else {
                present as u64 + rng.random::<u32>() as u64
            }
        })
        .collect()
}

/// SplitMix64 finaliser.
pub fn mix_seed(mut z: u64) -> u64 {
    z = z.wrapping_add(SEED_MIX);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
