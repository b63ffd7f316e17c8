use std::fmt::Write;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jobfit_core::parser::parse_dataset_str;

fn make_dataset(rows: usize) -> String {
    let mut csv = String::from("Job_Role,Question,Options,Answer,Q_ID,Difficulty_Level\n");
    for i in 0..rows {
        writeln!(
            csv,
            "Role {},\"Question {i}, with a comma?\",\"alpha;beta;gamma;delta\",gamma,{i},{}",
            i % 8,
            i % 3 + 1
        )
        .unwrap();
    }
    csv
}

fn bench_parse_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_dataset");
    let source = Path::new("bench.csv");

    let small = make_dataset(100);
    let large = make_dataset(10_000);

    group.bench_function("rows=100", |b| {
        b.iter(|| parse_dataset_str(black_box(&small), source).unwrap())
    });

    group.bench_function("rows=10000", |b| {
        b.iter(|| parse_dataset_str(black_box(&large), source).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parse_dataset);
criterion_main!(benches);
