//! Tree operation benchmarks

use std::hint::black_box;

use avl_catalog::tree::AvlTree;
use avl_catalog_bench::data_gen::{build_tree, generate_entries, generate_sorted_entries};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree/Insert");

    for size in [1_000, 10_000, 100_000].iter() {
        let random = generate_entries(*size);
        let sorted = generate_sorted_entries(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("random", size), &random, |b, entries| {
            b.iter(|| black_box(build_tree(entries)));
        });

        group.bench_with_input(BenchmarkId::new("ascending", size), &sorted, |b, entries| {
            b.iter(|| black_box(build_tree(entries)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree/Search");

    for size in [1_000, 10_000, 100_000].iter() {
        let entries = generate_entries(*size);
        let tree = build_tree(&entries);
        let probes: Vec<&str> = entries.iter().step_by(7).map(|e| e.key()).collect();
        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_with_input(BenchmarkId::new("hit", size), &probes, |b, probes| {
            b.iter(|| {
                for key in probes {
                    black_box(tree.search(key));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("node_level", size), &probes, |b, probes| {
            b.iter(|| {
                for key in probes.iter().take(100) {
                    black_box(tree.node_level(key));
                }
            });
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree/Delete");

    for size in [1_000, 10_000].iter() {
        let entries = generate_entries(*size);
        group.bench_with_input(BenchmarkId::new("all", size), &entries, |b, entries| {
            b.iter_with_setup(
                || build_tree(entries),
                |mut tree: AvlTree| {
                    for entry in entries {
                        black_box(tree.delete(entry.key()));
                    }
                },
            );
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree/Filter");

    for size in [1_000, 10_000, 100_000].iter() {
        let tree = build_tree(&generate_entries(*size));

        group.bench_with_input(BenchmarkId::new("tenth", size), &tree, |b, tree| {
            b.iter(|| black_box(tree.filter_by_range(1_000_000, 1_500_000).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("levels", size), &tree, |b, tree| {
            b.iter(|| black_box(tree.levels().count()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_delete, bench_filter);
criterion_main!(benches);
