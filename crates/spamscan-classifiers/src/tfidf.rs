//! TF-IDF vectorizer loaded from a JSON export
//!
//! The export carries the fitted vocabulary and IDF weights together with the
//! options that shaped them, so `transform` reproduces the features the
//! classifier was trained on. Fitting is done elsewhere.

use crate::classifier::{FeatureVector, Vectorizer};
use crate::stemmer::StemmerKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use spamscan_core::{Error, Result};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Divide by the sum of absolute values
    L1,
    /// Divide by the euclidean length
    L2,
}

/// Serialized form of a fitted TF-IDF vectorizer.
///
/// Unknown fields are rejected: an option this transform does not implement
/// (`stop_words`, `analyzer`, ...) would silently change the features.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TfidfSpec {
    /// Term to feature index mapping
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature index
    #[serde(default)]
    pub idf: Vec<f64>,

    /// Lower-case documents before tokenizing
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Regex whose matches are the terms
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    /// Inclusive n-gram bounds
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Row normalization, `null` for none
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    /// Multiply term frequencies by `idf`
    #[serde(default = "default_true")]
    pub use_idf: bool,

    /// Replace `tf` with `1 + ln(tf)`
    #[serde(default)]
    pub sublinear_tf: bool,

    /// Clamp term frequencies to 1
    #[serde(default)]
    pub binary: bool,

    /// Stemmer the documents were preprocessed with before fitting
    #[serde(default)]
    pub stemmer: StemmerKind,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    spec: TfidfSpec,
    token_regex: Regex,
}

impl TfidfVectorizer {
    /// Validate a spec and compile its token pattern
    pub fn from_spec(spec: TfidfSpec) -> Result<Self> {
        let n_features = spec.vocabulary.len();

        if let Some((term, idx)) = spec.vocabulary.iter().find(|(_, idx)| **idx >= n_features) {
            return Err(Error::config(format!(
                "vocabulary term '{}' has index {} but the vocabulary has {} terms",
                term, idx, n_features
            )));
        }

        if spec.use_idf && spec.idf.len() != n_features {
            return Err(Error::config(format!(
                "idf has {} weights for {} vocabulary terms",
                spec.idf.len(),
                n_features
            )));
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::config(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(&spec.token_pattern).map_err(|e| {
            Error::config(format!("invalid token_pattern '{}': {}", spec.token_pattern, e))
        })?;

        Ok(Self { spec, token_regex })
    }

    /// Parse and validate a JSON export
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TfidfSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    /// Load a JSON export from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Underlying spec
    pub fn spec(&self) -> &TfidfSpec {
        &self.spec
    }

    /// Feature index of a term, if known
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.spec.vocabulary.get(term).copied()
    }

    /// Vectorize a single document
    pub fn transform_one(&self, document: &str) -> FeatureVector {
        let text = if self.spec.lowercase {
            Cow::Owned(document.to_lowercase())
        } else {
            Cow::Borrowed(document)
        };

        let tokens: Vec<&str> = self.token_regex.find_iter(&text).map(|m| m.as_str()).collect();
        let counts = self.count_terms(&tokens);

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, self.weight(idx, count)))
            .collect();

        self.normalize(&mut weights);

        FeatureVector::from_entries(self.n_features(), weights)
    }

    /// Count known n-grams; unknown terms are ignored
    fn count_terms(&self, tokens: &[&str]) -> BTreeMap<usize, f64> {
        let (min_n, max_n) = self.spec.ngram_range;
        let mut counts = BTreeMap::new();

        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                let idx = if n == 1 {
                    self.term_index(window[0])
                } else {
                    self.term_index(&window.join(" "))
                };
                if let Some(idx) = idx {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        counts
    }

    fn weight(&self, idx: usize, count: f64) -> f64 {
        let tf = if self.spec.binary {
            1.0
        } else if self.spec.sublinear_tf {
            1.0 + count.ln()
        } else {
            count
        };

        if self.spec.use_idf {
            tf * self.spec.idf[idx]
        } else {
            tf
        }
    }

    fn normalize(&self, weights: &mut [(usize, f64)]) {
        let norm = match self.spec.norm {
            Some(Norm::L2) => weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => weights.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            None => return,
        };

        if norm > 0.0 {
            for (_, w) in weights.iter_mut() {
                *w /= norm;
            }
        }
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, documents: &[&str]) -> Result<Vec<FeatureVector>> {
        Ok(documents.iter().map(|doc| self.transform_one(doc)).collect())
    }

    fn n_features(&self) -> usize {
        self.spec.vocabulary.len()
    }
}
