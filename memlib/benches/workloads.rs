use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use memlib::cache::Cache;
use memlib::memory::MemorySystem;
use memlib::util::{naive_matrix_multiply, strided_sweep};

/// Benchmark the synthetic workloads against a small two-level hierarchy
pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Workloads");

    for n in [16usize, 32] {
        group.bench_with_input(BenchmarkId::new("naive_mmm", n), &n, |bench, &n| {
            bench.iter(|| {
                let mut system = MemorySystem::new();
                system.add_cache(Cache::with_label(128, 64, 1, "L1").unwrap());
                naive_matrix_multiply(n, &mut system);
            });
        });
    }

    for stride in [1usize, 8, 16] {
        group.bench_with_input(
            BenchmarkId::new("strided_sweep", stride),
            &stride,
            |bench, &stride| {
                bench.iter(|| {
                    let mut system = MemorySystem::new();
                    system.add_cache(Cache::with_label(4096, 64, 2, "L1").unwrap());
                    system.add_cache(Cache::with_label(4096, 64, 2, "L2").unwrap());
                    strided_sweep(40, stride, 2, &mut system);
                });
            },
        );
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
