//! Benchmark: full layout pass over trees of varying size.
//!
//! Measures one tidy-layout pass (survey + assignment + extent) at 100,
//! 1000, and 5000 visible nodes, which bounds the cost of every toggle.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dendro_core::{Record, TreeConfig};
use dendro_layout::TidyLayout;
use dendro_model::{build, Node};

// ── Helpers ──

/// Generate a synthetic record set with `n` nodes, fanout 8, so depth grows
/// logarithmically like a real org chart.
fn generate_records(n: usize) -> Vec<Record> {
    let mut records = Vec::with_capacity(n);
    records.push(Record::new("n0", "node 0", None));
    for i in 1..n {
        let parent = (i - 1) / 8;
        records.push(Record::new(
            format!("n{}", i),
            format!("node {}", i),
            Some(format!("n{}", parent)),
        ));
    }
    records
}

fn build_tree(n: usize) -> Node {
    let mut root = build(&generate_records(n)).unwrap();
    root.sort_recursive();
    root
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_pass");

    for &n in &[100usize, 1000, 5000] {
        let mut root = build_tree(n);
        let mut engine = TidyLayout::new(&TreeConfig::default());
        engine.measure(&root);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let result = engine.layout(black_box(&mut root));
                black_box(result.visible_count)
            })
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_build");

    for &n in &[100usize, 1000, 5000] {
        let records = generate_records(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| build(black_box(&records)).unwrap().count())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout, bench_build);
criterion_main!(benches);
