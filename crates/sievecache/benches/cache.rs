use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sievecache::SieveCache;

fn random_keys(n: usize, range: u64) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(0..range)).collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for capacity in [1024usize, 8192, 32768] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            let cache = SieveCache::new(capacity).unwrap();
            // Half the key space fits, the rest forces evictions
            let keys = random_keys(100_000, capacity as u64 * 2);

            let mut counter = 0;
            b.iter(|| {
                let key = keys[counter % keys.len()];
                black_box(cache.add(key, key));
                counter += 1;
            });
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_8192_hit_miss", |b| {
        let capacity = 8192;
        let cache = SieveCache::new(capacity).unwrap();
        for key in 0..capacity as u64 {
            cache.add(key, key);
        }

        // Even keys hit, odd keys mostly miss
        let mut rng = rand::thread_rng();
        let keys: Vec<u64> = (0..100_000)
            .map(|i| {
                if i % 2 == 0 {
                    rng.gen_range(0..capacity as u64)
                } else {
                    rng.gen_range(capacity as u64..capacity as u64 * 2)
                }
            })
            .collect();

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.get(&keys[counter % keys.len()]));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_get_or_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_or_add");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("probe_8192", |b| {
        let capacity = 8192;
        let cache = SieveCache::new(capacity).unwrap();
        let keys = random_keys(100_000, capacity as u64 * 2);

        let mut counter = 0;
        b.iter(|| {
            let key = keys[counter % keys.len()];
            black_box(cache.probe(key, key));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("add_delete_8192", |b| {
        let capacity = 8192usize;
        let cache = SieveCache::new(capacity).unwrap();

        let mut i = 0usize;
        b.iter(|| {
            // Mostly fresh keys, with a third reusing hot ones
            let key = if i % 3 == 0 { i % (capacity / 2) } else { i + capacity };
            cache.add(key, key);
            // Frees slots for reuse
            if i % 5 == 0 && i > 0 {
                cache.delete(&key.saturating_sub(1));
            }
            i += 1;
        });
    });

    group.finish();
}

fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements(threads as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let capacity = 16384;
            let cache = Arc::new(SieveCache::new(capacity).unwrap());

            b.iter_custom(|iters| {
                let start = Instant::now();
                thread::scope(|s| {
                    for _ in 0..threads {
                        let cache = Arc::clone(&cache);
                        s.spawn(move || {
                            let mut rng = rand::thread_rng();
                            for _ in 0..iters {
                                let key = rng.gen_range(0..capacity as u64 * 2);
                                match rng.gen_range(0..10) {
                                    0..=5 => {
                                        black_box(cache.get(&key));
                                    }
                                    6..=8 => {
                                        black_box(cache.add(key, key));
                                    }
                                    _ => {
                                        black_box(cache.delete(&key));
                                    }
                                }
                            }
                        });
                    }
                });
                start.elapsed()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_get,
    bench_get_or_add,
    bench_churn,
    bench_concurrent
);
criterion_main!(benches);
