//! Criterion benchmarks for nlu-prep.
//!
//! Measures preparation throughput through the default pipeline for lists of
//! strings and lists of labelled objects.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use nlu_prep::nlu::Nlu;
use nlu_prep::settings::SettingsOverrides;
use serde_json::{Value, json};
use std::hint::black_box;

/// Generate utterances for benchmarking.
fn generate_utterances(count: usize) -> Vec<String> {
    let words = [
        "allí", "hay", "un", "ratón", "and", "the", "señor", "doctor", "walking", "cats",
        "manejando", "cuatrimotor", "running", "agreement", "beautiful", "with",
    ];

    (0..count)
        .map(|i| {
            (0..12)
                .map(|j| words[(i * 7 + j * 3) % words.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_prepare(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let nlu = Nlu::new(SettingsOverrides::new().keep_stopwords(false));
    let utterances = generate_utterances(200);

    let mut group = c.benchmark_group("prepare");
    group.throughput(Throughput::Elements(utterances.len() as u64));

    let strings: Value = json!(utterances);
    group.bench_function("string_list", |b| {
        b.iter(|| runtime.block_on(nlu.prepare(black_box(&strings), None)))
    });

    let objects: Value = utterances
        .iter()
        .enumerate()
        .map(|(i, text)| json!({ "text": text, "intent": format!("intent_{}", i % 10) }))
        .collect();
    group.bench_function("object_list", |b| {
        b.iter(|| runtime.block_on(nlu.prepare(black_box(&objects), None)))
    });

    group.finish();
}

criterion_group!(benches, bench_prepare);
criterion_main!(benches);
