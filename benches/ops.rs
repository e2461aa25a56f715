// model = "claude-opus-4-5"
// created = "2026-08-02"
// modified = "2026-08-02"
// driver = "Isaac Clayton"

//! Benchmarks against `Vec` for the operations the skip list exists for:
//! mid-sequence mutation on long sequences, bulk building, and cached
//! sequential reads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use skipvec::{BufferedSkipVec, SkipVec};

const SEED: (u64, u64) = (12345, 67891);

fn build_list(n: usize) -> SkipVec<i64> {
    let mut list = SkipVec::new();
    list.seed(SEED.0, SEED.1);
    for i in (0..n as i64).rev() {
        list.push_front(i);
    }
    list
}

fn bench_mid_insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_remove_middle");
    for &n in &[1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("skipvec", n), &n, |b, &n| {
            let mut list = build_list(n);
            b.iter(|| {
                list.insert(black_box(n / 2), -1);
                list.remove(black_box(n / 2));
            });
        });
        group.bench_with_input(BenchmarkId::new("buffered", n), &n, |b, &n| {
            let mut list: BufferedSkipVec<i64> = BufferedSkipVec::new();
            list.seed(SEED.0, SEED.1);
            for i in 0..n as i64 {
                list.push_back(i);
            }
            b.iter(|| {
                list.insert(black_box(n / 2), -1);
                list.remove(black_box(n / 2));
            });
        });
        group.bench_with_input(BenchmarkId::new("vec", n), &n, |b, &n| {
            let mut v: Vec<i64> = (0..n as i64).collect();
            b.iter(|| {
                v.insert(black_box(n / 2), -1);
                v.remove(black_box(n / 2));
            });
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 50_000] {
        group.bench_with_input(BenchmarkId::new("push_front", n), &n, |b, &n| {
            b.iter(|| build_list(n));
        });
        group.bench_with_input(BenchmarkId::new("push_back", n), &n, |b, &n| {
            b.iter(|| {
                let mut list = SkipVec::new();
                list.seed(SEED.0, SEED.1);
                for i in 0..n as i64 {
                    list.push_back(i);
                }
                list
            });
        });
        group.bench_with_input(BenchmarkId::new("vec_push", n), &n, |b, &n| {
            b.iter(|| (0..n as i64).collect::<Vec<_>>());
        });
    }
    group.finish();
}

fn bench_strided_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("strided_read");
    let n = 100_000;
    let list = build_list(n);
    group.bench_function("indexed_stride_3", |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for i in (0..n).step_by(3) {
                sum += list[i];
            }
            black_box(sum)
        });
    });
    group.bench_function("iter", |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for (i, v) in list.iter().enumerate() {
                if i % 3 == 0 {
                    sum += v;
                }
            }
            black_box(sum)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_mid_insert_remove,
    bench_build,
    bench_strided_read
);
criterion_main!(benches);
