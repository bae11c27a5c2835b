//! Set operation and query evaluation benchmarks
//!
//! Run with: cargo bench

use boolsearch::query::parse_query;
use boolsearch::query::setops::{difference, intersect, union, universe};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Every `step`-th document starting at `start`, up to `max`
fn strided(start: u32, step: u32, max: u32) -> Vec<u32> {
    (start..=max).step_by(step as usize).collect()
}

fn bench_merges(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for max in [10_000u32, 1_000_000] {
        let a = strided(1, 3, max);
        let b = strided(2, 7, max);

        group.bench_with_input(BenchmarkId::new("intersect", max), &max, |bench, _| {
            bench.iter(|| intersect(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("union", max), &max, |bench, _| {
            bench.iter(|| union(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_not(c: &mut Criterion) {
    let mut group = c.benchmark_group("not");

    // Cost follows the universe size, not the selectivity of the operand
    for max in [10_000u32, 1_000_000] {
        let all = universe(max);
        let sparse = strided(1, 1000, max);
        let dense = strided(1, 2, max);

        group.bench_with_input(BenchmarkId::new("sparse", max), &max, |bench, _| {
            bench.iter(|| difference(black_box(&all), black_box(&sparse)))
        });
        group.bench_with_input(BenchmarkId::new("dense", max), &max, |bench, _| {
            bench.iter(|| difference(black_box(&all), black_box(&dense)))
        });
    }

    group.finish();
}

fn bench_query_parsing(c: &mut Criterion) {
    let queries = vec![
        "simple",
        "cat AND dog",
        "(cat OR dog) AND NOT bird",
        "NOT NOT (a OR b OR c) AND (d OR (e AND NOT f))",
    ];

    let mut group = c.benchmark_group("query_parsing");
    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &q| {
            b.iter(|| parse_query(black_box(q)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merges, bench_not, bench_query_parsing);
criterion_main!(benches);
