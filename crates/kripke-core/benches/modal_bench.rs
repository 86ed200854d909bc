// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Modal Evaluation Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for per-subject evaluation and batch
//! classification on the lung-disease frame.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kripke_core::{
    shared_lung_disease_frame, ClassificationDriver, LabeledSubject, ModalEvaluator,
};
use kripke_types::Subject;

fn high_risk_subject() -> Subject {
    Subject::builder("bench-high", 67, "M")
        .attribute("smoking_history", 8)
        .attribute("coughing_blood", 6)
        .attribute("chest_pain", 7)
        .attribute("shortness_of_breath", 7)
        .attribute("weight_loss", 5)
        .lab_result("oxygen_saturation", 91.0)
        .finding("lung", true)
        .build()
}

fn evaluator() -> ModalEvaluator {
    let frame = shared_lung_disease_frame().expect("lung frame builds");
    ModalEvaluator::with_defaults(frame)
}

// ── Proposition registry ────────────────────────────────────────────

fn bench_active_propositions(c: &mut Criterion) {
    let ev = evaluator();
    let subject = high_risk_subject();
    c.bench_function("active_propositions", |b| {
        b.iter(|| ev.active_propositions(black_box(&subject)))
    });
}

// ── ModalEvaluator.evaluate() / rank() ──────────────────────────────

fn bench_evaluate(c: &mut Criterion) {
    let ev = evaluator();
    let subject = high_risk_subject();
    c.bench_function("evaluate_3_worlds", |b| {
        b.iter(|| ev.evaluate(black_box(&subject)))
    });
}

fn bench_rank(c: &mut Criterion) {
    let ev = evaluator();
    let subject = high_risk_subject();
    c.bench_function("rank_top3", |b| b.iter(|| ev.rank(black_box(&subject), 3)));
}

fn bench_rank_fallback(c: &mut Criterion) {
    let ev = evaluator();
    let subject = Subject::builder("bench-none", 40, "?").build();
    c.bench_function("rank_fallback", |b| {
        b.iter(|| ev.rank(black_box(&subject), 3))
    });
}

// ── Batch driver ────────────────────────────────────────────────────

fn bench_batch_1000(c: &mut Criterion) {
    let ev = evaluator();
    let items: Vec<LabeledSubject> = (0..1000)
        .map(|i| {
            let subject = Subject::builder(format!("s{i}"), 20 + (i % 60), "M")
                .attribute("smoking_history", (i % 10) as f64)
                .attribute("chest_pain", ((i * 7) % 10) as f64)
                .build();
            LabeledSubject::new(subject, Some("Medium".into()))
        })
        .collect();
    let driver = ClassificationDriver::new(&ev);
    c.bench_function("classify_batch_1000", |b| {
        b.iter(|| driver.classify_batch(black_box(&items)))
    });
}

criterion_group!(
    benches,
    bench_active_propositions,
    bench_evaluate,
    bench_rank,
    bench_rank_fallback,
    bench_batch_1000,
);
criterion_main!(benches);
