//! B+Tree benchmarks: insert, point lookup and range scan.

use bplusdb::BPlusTree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Distinct, non-sequential keys (100_003 is prime).
fn scattered_keys(count: i32) -> Vec<i32> {
    (0..count).map(|k| k.wrapping_mul(7919) % 100_003).collect()
}

fn build(order: usize, keys: &[i32]) -> BPlusTree<u64> {
    let mut tree = BPlusTree::new(order).unwrap();
    for &key in keys {
        tree.insert(key, key as u64).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_insert");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let ascending: Vec<i32> = (0..count).collect();
        let scattered = scattered_keys(count);

        for order in [5, 32] {
            group.bench_with_input(
                BenchmarkId::new(format!("ascending/order{order}"), count),
                &ascending,
                |b, keys| b.iter(|| build(order, black_box(keys))),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("scattered/order{order}"), count),
                &scattered,
                |b, keys| b.iter(|| build(order, black_box(keys))),
            );
        }
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_find");
    let keys = scattered_keys(10_000);

    for order in [5, 32] {
        let tree = build(order, &keys);
        group.bench_function(BenchmarkId::new("hit", order), |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(tree.find(keys[i]))
            })
        });
        group.bench_function(BenchmarkId::new("miss", order), |b| {
            b.iter(|| black_box(tree.find(black_box(-1))))
        });
    }

    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_range");
    let tree = build(5, &(0..100_000).collect::<Vec<_>>());

    for width in [10, 1_000, 10_000] {
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| tree.range(black_box(50_000), 50_000 + width - 1).count())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_find, bench_range);
criterion_main!(benches);
