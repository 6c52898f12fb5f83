//! Prediction service: raw email text in, label and confidence out

use crate::artifacts::ArtifactStore;
use crate::classifier::{Classifier, Vectorizer};
use crate::config::ClassifierConfig;
use crate::preprocess::TextPreprocessor;
use spamscan_core::{EmailText, Error, PredictionResult, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Composes preprocessing, vectorization and classification.
///
/// Holds no presentation state; every call is independent.
pub struct PredictionService {
    preprocessor: Arc<TextPreprocessor>,
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    /// Create a service from already-loaded parts
    pub fn new(
        preprocessor: Arc<TextPreprocessor>,
        vectorizer: Arc<dyn Vectorizer>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            preprocessor,
            vectorizer,
            classifier,
        }
    }

    /// Create a service over the artifacts in `store`.
    ///
    /// The preprocessor must stem with the algorithm the vocabulary was
    /// fitted with, otherwise most terms would never match.
    pub fn from_store(preprocessor: Arc<TextPreprocessor>, store: &ArtifactStore) -> Result<Self> {
        if preprocessor.stemmer_kind() != store.stemmer() {
            return Err(Error::artifact(
                &store.paths().vectorizer,
                format!(
                    "vocabulary was fitted with the {} stemmer but the preprocessor uses {}",
                    store.stemmer(),
                    preprocessor.stemmer_kind()
                ),
            ));
        }

        Ok(Self::new(preprocessor, store.vectorizer(), store.classifier()))
    }

    /// Startup path: eager resource bootstrap, then artifact loading.
    ///
    /// An unavailable tokenizer resource does not stop startup; missing or
    /// corrupt artifacts do.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let bootstrapper = Arc::new(config.tokenizer.bootstrapper());
        let outcome = bootstrapper.ensure();
        info!(
            "Tokenizer resource {}: {}",
            bootstrapper.resource().name(),
            if outcome.is_available() { "available" } else { "unavailable" }
        );

        let store = ArtifactStore::load(&config.artifacts)?;
        let preprocessor =
            Arc::new(TextPreprocessor::new(bootstrapper).with_stemmer(store.stemmer()));

        Self::from_store(preprocessor, &store)
    }

    /// Classify one email.
    ///
    /// Blank input is rejected with `EmptyInput` before any artifact is
    /// touched. A missing tokenizer resource propagates as
    /// `ResourceMissing`; other pipeline failures become `Prediction`.
    pub fn predict(&self, raw: &str) -> Result<PredictionResult> {
        let text = EmailText::parse(raw)?;
        let start = Instant::now();

        let result = self.run(text);

        match &result {
            Ok(prediction) => {
                let label = prediction.label.as_str();
                metrics::counter!("spamscan_predictions_total", "label" => label).increment(1);
                debug!(
                    label,
                    confidence = prediction.confidence,
                    latency_us = start.elapsed().as_micros() as u64,
                    "Prediction complete"
                );
            }
            Err(e) => {
                metrics::counter!("spamscan_prediction_errors_total", "kind" => e.kind())
                    .increment(1);
                debug!("Prediction failed: {}", e);
            }
        }

        result
    }

    fn run(&self, text: EmailText<'_>) -> Result<PredictionResult> {
        let processed = self.preprocessor.preprocess(text.as_str())?;

        let rows = self
            .vectorizer
            .transform(&[processed.as_str()])
            .map_err(into_prediction_error)?;

        let class = self
            .classifier
            .predict(&rows)
            .map_err(into_prediction_error)?
            .first()
            .copied()
            .ok_or_else(|| Error::prediction("classifier returned no prediction"))?;

        let probabilities = self
            .classifier
            .predict_proba(&rows)
            .map_err(into_prediction_error)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::prediction("classifier returned no probabilities"))?;

        if probabilities.len() != 2 {
            return Err(Error::prediction(format!(
                "expected 2 class probabilities, got {}",
                probabilities.len()
            )));
        }

        PredictionResult::from_distribution(class, &probabilities)
    }
}

fn into_prediction_error(err: Error) -> Error {
    match err {
        Error::Prediction(_) => err,
        other => Error::prediction(other.to_string()),
    }
}
