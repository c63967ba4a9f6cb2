use std::hint::black_box;

use ai_session_viewer::changes::extract_changes_from_content;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};

fn body(lines: usize) -> String {
    (0..lines).map(|i| format!("let value_{} = {};", i, i)).collect::<Vec<_>>().join("\n")
}

/// Assistant content with `tools` structured tool_use parts
fn structured_content(tools: usize, lines: usize) -> Value {
    let parts: Vec<Value> = (0..tools)
        .map(|i| {
            json!({
                "type": "tool_use",
                "name": if i % 2 == 0 { "Write" } else { "Edit" },
                "input": {
                    "file_path": format!("src/file_{}.rs", i),
                    "content": body(lines),
                    "old_string": body(lines / 2),
                    "new_string": body(lines),
                }
            })
        })
        .collect();
    json!({ "content": parts })
}

/// The same envelopes serialized into free text between prose
fn embedded_content(tools: usize, lines: usize) -> Value {
    let mut text = String::new();
    for i in 0..tools {
        let envelope = json!({
            "name": "write",
            "input": {"file_path": format!("src/file_{}.rs", i), "content": body(lines)}
        });
        text.push_str(&format!("Step {} {{not json}} then {}\n", i, envelope));
    }
    Value::String(text)
}

fn bench_extract_changes(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_changes");

    for tools in [1, 10, 100].iter() {
        let structured = structured_content(*tools, 50);
        let embedded = embedded_content(*tools, 50);

        group.throughput(Throughput::Elements(*tools as u64));
        group.bench_with_input(BenchmarkId::new("structured", tools), &structured, |b, content| {
            b.iter(|| extract_changes_from_content(black_box(content)));
        });
        group.bench_with_input(BenchmarkId::new("embedded", tools), &embedded, |b, content| {
            b.iter(|| extract_changes_from_content(black_box(content)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract_changes);
criterion_main!(benches);
