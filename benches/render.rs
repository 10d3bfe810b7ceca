use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rapid_reporter::render::OutputFormat;
use rapid_reporter::types::{Column, Row, Value};

fn rows_of_n(n: usize) -> Vec<Row> {
    (0..n as i64)
        .map(|i| {
            [
                ("id", Value::Int64(i)),
                ("name", Value::from(format!("customer {i}"))),
                ("amount", Value::Float64(i as f64 * 1.25)),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("ID", "id"),
        Column::new("Name", "name"),
        Column::new("Amount", "amount").with_total(),
    ]
}

fn bench_render(c: &mut Criterion) {
    let cols = columns();

    for format in [OutputFormat::Html, OutputFormat::Csv, OutputFormat::Json] {
        let mut group = c.benchmark_group(format!("render_{format}"));
        for n in [100usize, 10_000] {
            let rows = rows_of_n(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
                b.iter(|| format.render(black_box(rows), &cols));
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
