//! Latency benchmarks for the prediction pipeline
//!
//! Measures preprocessing alone and full predictions over the test fixtures.
//!
//! Run with: cargo bench -p spamscan-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;

use spamscan_classifiers::{
    ArtifactPaths, ArtifactStore, LocalFetcher, PredictionService, ResourceBootstrapper,
    RetryPolicy, TextPreprocessor, TokenizerResource,
};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn test_cases() -> Vec<(&'static str, String)> {
    vec![
        ("short_ham", "See you at lunch.".to_string()),
        (
            "short_spam",
            "Congratulations! You won a free prize, click here now!!!".to_string(),
        ),
        (
            "medium_ham",
            "Let's meet tomorrow at 10am to discuss the report. I'll bring the printed \
             copies and the budget figures from last quarter."
                .to_string(),
        ),
        (
            "long_mixed",
            "Dear customer, you have been selected for a free prize. ".repeat(40),
        ),
    ]
}

fn preprocessor() -> Arc<TextPreprocessor> {
    let bootstrapper = ResourceBootstrapper::new(
        TokenizerResource::default(),
        Arc::new(LocalFetcher::new(format!("{}/tokenizer.json", FIXTURES))),
    )
    .with_retry_policy(RetryPolicy {
        max_attempts: 1,
        delay: Duration::ZERO,
    });
    Arc::new(TextPreprocessor::new(Arc::new(bootstrapper)))
}

fn benchmark_preprocess(c: &mut Criterion) {
    let preprocessor = preprocessor();

    let mut group = c.benchmark_group("Preprocess");
    group.sample_size(100);

    for (name, text) in test_cases() {
        group.bench_with_input(BenchmarkId::new("preprocess", name), &text, |b, text| {
            b.iter(|| preprocessor.preprocess(black_box(text)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let store = ArtifactStore::load(&ArtifactPaths::in_dir(FIXTURES))
        .expect("Failed to load fixture artifacts");
    let service = PredictionService::from_store(preprocessor(), &store)
        .expect("Fixture stemmer mismatch");

    let mut group = c.benchmark_group("Predict");
    group.sample_size(100);

    for (name, text) in test_cases() {
        group.bench_with_input(BenchmarkId::new("predict", name), &text, |b, text| {
            b.iter(|| service.predict(black_box(text)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_preprocess, benchmark_predict);
criterion_main!(benches);
