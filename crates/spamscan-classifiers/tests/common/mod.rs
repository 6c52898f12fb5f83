//! Mock artifacts for testing
//!
//! Configurable stand-ins for the vectorizer and classifier that count how
//! often they are invoked, plus helpers for building a preprocessor over the
//! fixture tokenizer.

#![allow(dead_code)]

use spamscan_classifiers::{
    Classifier, FeatureVector, LocalFetcher, ResourceBootstrapper, RetryPolicy, StemmerKind,
    TextPreprocessor, TokenizerResource, Vectorizer,
};
use spamscan_core::{Error, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Preprocessor backed by the fixture tokenizer
pub fn fixture_preprocessor() -> Arc<TextPreprocessor> {
    preprocessor_at(format!("{}/tokenizer.json", FIXTURES))
}

/// Fixture-tokenizer preprocessor using another stemmer
pub fn fixture_preprocessor_with(stemmer: StemmerKind) -> Arc<TextPreprocessor> {
    Arc::new(bootstrapped_at(format!("{}/tokenizer.json", FIXTURES)).with_stemmer(stemmer))
}

/// Preprocessor whose tokenizer resource lives at `path`
pub fn preprocessor_at(path: impl Into<std::path::PathBuf>) -> Arc<TextPreprocessor> {
    Arc::new(bootstrapped_at(path))
}

fn bootstrapped_at(path: impl Into<std::path::PathBuf>) -> TextPreprocessor {
    let bootstrapper = ResourceBootstrapper::new(
        TokenizerResource::default(),
        Arc::new(LocalFetcher::new(path)),
    )
    .with_retry_policy(RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
    });
    TextPreprocessor::new(Arc::new(bootstrapper))
}

/// A vectorizer that records the documents it sees
pub struct MockVectorizer {
    dim: usize,
    call_count: AtomicU32,
    fail: bool,
    seen: parking_lot::Mutex<Vec<String>>,
}

impl MockVectorizer {
    /// Create a mock producing rows of width `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            call_count: AtomicU32::new(0),
            fail: false,
            seen: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Make every transform fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get the number of times transform was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Documents passed to transform, in order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

impl Vectorizer for MockVectorizer {
    fn transform(&self, documents: &[&str]) -> Result<Vec<FeatureVector>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(Error::config("simulated vectorizer failure"));
        }
        self.seen
            .lock()
            .extend(documents.iter().map(|d| d.to_string()));
        Ok(documents.iter().map(|_| FeatureVector::zeros(self.dim)).collect())
    }

    fn n_features(&self) -> usize {
        self.dim
    }
}

/// A classifier returning a fixed class and distribution
pub struct MockClassifier {
    class: u8,
    probabilities: Vec<f64>,
    predict_calls: AtomicU32,
    proba_calls: AtomicU32,
}

impl MockClassifier {
    /// Create a mock that predicts `class` with `probabilities`
    pub fn new(class: u8, probabilities: &[f64]) -> Self {
        Self {
            class,
            probabilities: probabilities.to_vec(),
            predict_calls: AtomicU32::new(0),
            proba_calls: AtomicU32::new(0),
        }
    }

    /// Total calls to predict and predict_proba
    pub fn call_count(&self) -> u32 {
        self.predict_calls.load(Ordering::Relaxed) + self.proba_calls.load(Ordering::Relaxed)
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<u8>> {
        self.predict_calls.fetch_add(1, Ordering::Relaxed);
        Ok(rows.iter().map(|_| self.class).collect())
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<Vec<f64>>> {
        self.proba_calls.fetch_add(1, Ordering::Relaxed);
        Ok(rows.iter().map(|_| self.probabilities.clone()).collect())
    }

    fn n_features(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "mock"
    }
}
