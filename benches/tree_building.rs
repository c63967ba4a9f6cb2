use std::hint::black_box;

use ai_session_viewer::{Record, Role, build_tree};
use chrono::DateTime;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Alternating user/assistant records, each replying to the previous one, with a branch
/// every 10 records
fn generate_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            let ts = DateTime::from_timestamp(1_700_000_000 + i as i64, 0).unwrap();
            let record = Record::new(format!("m{}", i), role, format!("Message body {}", i), ts);
            match i {
                0 => record,
                i if i % 10 == 0 => record.with_parent(format!("m{}", i / 2)),
                i => record.with_parent(format!("m{}", i - 1)),
            }
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for size in [100, 1_000, 10_000, 50_000].iter() {
        let records = generate_records(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| build_tree(black_box(records.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_tree);
criterion_main!(benches);
