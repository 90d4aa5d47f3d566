use chain_hashmap::ChainHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::time::Duration;

const ENTRIES: usize = 10_000;
// Default bucket count versus one wide enough to keep chains short.
const BUCKET_COUNTS: [usize; 2] = [42, 4096];

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(buckets: usize, seed: u64) -> (ChainHashMap<u64>, Vec<String>) {
    let mut m = ChainHashMap::with_bucket_count(buckets).unwrap();
    let keys: Vec<String> = lcg(seed).take(ENTRIES).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.set(k.as_str(), i as u64);
    }
    (m, keys)
}

fn bench_set_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain::set_fresh_10k");
    for buckets in BUCKET_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &n| {
            b.iter_batched(
                || ChainHashMap::<u64>::with_bucket_count(n).unwrap(),
                |mut m| {
                    for (i, x) in lcg(1).take(ENTRIES).enumerate() {
                        m.set(key(x), i as u64);
                    }
                    black_box(m)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_set_overwrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain::set_overwrite_10k");
    for buckets in BUCKET_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &n| {
            b.iter_batched(
                || filled(n, 2),
                |(mut m, keys)| {
                    for k in &keys {
                        black_box(m.set(k.as_str(), 0));
                    }
                    black_box(m)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain::get_hit_1k");
    for buckets in BUCKET_COUNTS {
        let (m, keys) = filled(buckets, 7);
        // Precompute 1k random query keys using LCG
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<&str> = (0..1_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % keys.len()].as_str()
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &queries, |b, qs| {
            b.iter(|| {
                for k in qs {
                    black_box(m.get(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain::get_miss_1k");
    for buckets in BUCKET_COUNTS {
        let (m, _keys) = filled(buckets, 11);
        let misses: Vec<String> = lcg(0xdead_beef).take(1_000).map(key).collect();
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &misses, |b, qs| {
            b.iter(|| {
                for k in qs {
                    black_box(m.get(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_remove_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain::remove_all_10k");
    for buckets in BUCKET_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &n| {
            b.iter_batched(
                || filled(n, 5),
                |(mut m, keys)| {
                    for k in &keys {
                        black_box(m.remove(k));
                    }
                    black_box(m)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_write;
    config = bench_config();
    targets = bench_set_fresh, bench_set_overwrite, bench_remove_all
}
criterion_group! {
    name = benches_read;
    config = bench_config();
    targets = bench_get_hit, bench_get_miss
}
criterion_main!(benches_write, benches_read);
