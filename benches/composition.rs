use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tabflow_core::types::{Column, Scalar, Table, Value};
use tabflow_operators::{Compose, FnOperator, Node};

fn make_table(rows: usize) -> Table {
    let mut groups = Vec::with_capacity(rows);
    let mut values = Vec::with_capacity(rows);
    for i in 0..rows {
        groups.push(Scalar::Str(format!("group-{}", i % 4)));
        values.push(Scalar::F64((i % 10) as f64));
    }
    Table::new(vec![Column::new("group", groups), Column::new("value", values)])
}

/// Branch that does a fixed amount of per-row work and returns the column sum.
fn summing_branch(i: usize) -> Node {
    Node::new(FnOperator::each(format!("sum-{i}"), |v| {
        let total = v
            .as_table()
            .and_then(|t| t.column("value"))
            .map(|c| c.values.iter().filter_map(Scalar::as_f64).map(|x| x.sqrt().sin()).sum::<f64>())
            .unwrap_or(0.0);
        Ok(Value::Scalar(Scalar::F64(total)))
    }))
}

fn bench_compose(c: &mut Criterion) {
    let input = vec![Value::Table(make_table(50_000))];
    let mut group = c.benchmark_group("compose_8_branches");
    for workers in [1usize, 2, 4, 8] {
        let branches = (0..8).map(summing_branch).collect();
        let compose = Node::new(
            Compose::new(branches)
                .unwrap()
                .with_workers(workers),
        );
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| compose.process(input.clone()).unwrap())
        });
    }
    group.finish();
    tabflow_exec::shutdown_pool();
}

criterion_group!(composition, bench_compose);
criterion_main!(composition);
