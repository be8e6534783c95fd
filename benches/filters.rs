//! Filter operation benchmarks.
//!
//! # Scenarios
//!
//! 1. **Add by capacity**: latency of `add` as the slice width grows
//! 2. **Add by error rate**: tighter targets mean more slices and digests
//! 3. **Contains**: hits versus misses on a filter loaded to capacity
//! 4. **Scalable add**: cost of growth amortized over a long insert run
//! 5. **Set algebra**: union, intersection and `nstar`
//! 6. **Codec**: encode and decode of a loaded filter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scalebloom::{BloomFilter, GrowthMode, ScalableBloomFilter};

const CAPACITIES: &[usize] = &[1_000, 10_000, 100_000, 1_000_000];
const ERROR_RATES: &[f64] = &[0.1, 0.01, 0.001, 0.0001];

fn generate_strings(count: usize, len: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn loaded(capacity: usize, error_rate: f64, items: &[String]) -> BloomFilter {
    let mut filter = BloomFilter::new(capacity, error_rate).unwrap();
    for item in items.iter().take(capacity) {
        filter.add(item);
    }
    filter
}

fn bench_add_by_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_by_capacity");
    let items = generate_strings(10_000, 32);

    for &capacity in CAPACITIES {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut filter = BloomFilter::new(capacity, 0.01).unwrap();
                let mut idx = 0;
                b.iter(|| {
                    black_box(filter.add(black_box(&items[idx % items.len()])));
                    idx += 1;
                });
            },
        );
    }
    group.finish();
}

fn bench_add_by_error_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_by_error_rate");
    let items = generate_strings(10_000, 32);

    for &error_rate in ERROR_RATES {
        group.bench_with_input(
            BenchmarkId::from_parameter(error_rate),
            &error_rate,
            |b, &error_rate| {
                let mut filter = BloomFilter::new(100_000, error_rate).unwrap();
                let mut idx = 0;
                b.iter(|| {
                    black_box(filter.add(black_box(&items[idx % items.len()])));
                    idx += 1;
                });
            },
        );
    }
    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");
    let members = generate_strings(10_000, 32);
    let outsiders: Vec<String> = (0..10_000).map(|i| format!("outsider-{i}")).collect();
    let filter = loaded(10_000, 0.01, &members);

    group.bench_function("hit", |b| {
        let mut idx = 0;
        b.iter(|| {
            black_box(filter.contains(black_box(&members[idx % members.len()])));
            idx += 1;
        });
    });
    group.bench_function("miss", |b| {
        let mut idx = 0;
        b.iter(|| {
            black_box(filter.contains(black_box(&outsiders[idx % outsiders.len()])));
            idx += 1;
        });
    });
    group.finish();
}

fn bench_scalable_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalable_add");
    let items = generate_strings(10_000, 16);

    for mode in [GrowthMode::SmallSetGrowth, GrowthMode::LargeSetGrowth] {
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_function(BenchmarkId::from_parameter(mode.multiplier()), |b| {
            b.iter(|| {
                let mut sbf = ScalableBloomFilter::new(100, 0.001, mode, 0.9).unwrap();
                for item in &items {
                    sbf.add(item);
                }
                black_box(sbf.filter_count())
            });
        });
    }
    group.finish();
}

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_algebra");
    let items = generate_strings(20_000, 24);
    let left = loaded(10_000, 0.01, &items[..10_000]);
    let right = loaded(10_000, 0.01, &items[10_000..]);

    group.bench_function("union", |b| {
        b.iter(|| black_box(left.union(&right).unwrap()))
    });
    group.bench_function("intersection", |b| {
        b.iter(|| black_box(left.intersection(&right).unwrap()))
    });
    group.bench_function("nstar", |b| b.iter(|| black_box(left.nstar())));
    group.bench_function("nstar_intersection", |b| {
        b.iter(|| black_box(left.nstar_intersection(&right).unwrap()))
    });
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let items = generate_strings(100_000, 24);
    let filter = loaded(100_000, 0.001, &items);
    let bytes = filter.to_bytes();

    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("encode", |b| b.iter(|| black_box(filter.to_bytes())));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(BloomFilter::from_bytes(black_box(&bytes)).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_add_by_capacity,
    bench_add_by_error_rate,
    bench_contains,
    bench_scalable_add,
    bench_set_algebra,
    bench_codec
);
criterion_main!(benches);
