//! Traced operation benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stepwise_avl::{AvlTree, TraceConfig};

fn shuffled_keys(n: i64) -> Vec<i64> {
    // fixed multiplicative permutation of 0..n
    (0..n).map(|i| (i * 7919) % n).collect()
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[64i64, 512, 2048] {
        let keys = shuffled_keys(n);
        group.bench_with_input(BenchmarkId::new("minimal", n), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = AvlTree::new();
                for &key in keys {
                    black_box(tree.insert(key));
                }
                tree
            });
        });
        group.bench_with_input(BenchmarkId::new("presentation", n), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = AvlTree::with_config(TraceConfig::presentation());
                for &key in keys {
                    black_box(tree.insert(key));
                }
                tree
            });
        });
    }
    group.finish();
}

fn benchmark_delete(c: &mut Criterion) {
    let keys = shuffled_keys(1024);

    c.bench_function("delete_half_n=1024", |b| {
        b.iter(|| {
            let mut tree: AvlTree<i64> = keys.iter().copied().collect();
            for key in keys.iter().step_by(2) {
                black_box(tree.delete(key));
            }
            tree
        });
    });
}

fn benchmark_search(c: &mut Criterion) {
    let keys = shuffled_keys(2048);
    let mut tree: AvlTree<i64> = keys.iter().copied().collect();

    c.bench_function("search_with_trace_n=2048", |b| {
        b.iter(|| black_box(tree.search_with_trace(black_box(&1500))));
    });
    c.bench_function("search_n=2048", |b| {
        b.iter(|| black_box(tree.search(black_box(&1500)).is_some()));
    });
}

criterion_group!(benches, benchmark_insert, benchmark_delete, benchmark_search);
criterion_main!(benches);
