//! Vectorizer and classifier traits and the feature vector they exchange

use spamscan_core::Result;

/// Turns preprocessed documents into feature vectors.
///
/// Implementations are immutable once built; `transform` takes `&self` so a
/// single instance can be shared across requests without locking.
pub trait Vectorizer: Send + Sync {
    /// Transform each document into one feature row
    fn transform(&self, documents: &[&str]) -> Result<Vec<FeatureVector>>;

    /// Width of every produced row
    fn n_features(&self) -> usize;
}

/// Binary spam classifier over feature vectors.
///
/// Classes are `0` (ham) and `1` (spam); probability rows are indexed by
/// class.
pub trait Classifier: Send + Sync {
    /// Predicted class for each row
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<u8>>;

    /// Class probability distribution for each row
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<Vec<f64>>>;

    /// Number of features each row must have
    fn n_features(&self) -> usize;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Sparse feature row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    /// Sorted by index, no duplicates
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// All-zero row of the given width
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a row from `(index, value)` pairs.
    ///
    /// Entries are sorted; for duplicate indices the last value wins.
    /// Indices outside `dim` are dropped.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> =
            entries.into_iter().filter(|(idx, _)| *idx < dim).collect();
        entries.sort_by_key(|(idx, _)| *idx);

        let mut deduped: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (idx, value) in entries {
            match deduped.last_mut() {
                Some(last) if last.0 == idx => last.1 = value,
                _ => deduped.push((idx, value)),
            }
        }

        Self {
            dim,
            entries: deduped,
        }
    }

    /// Row width
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Stored entries in index order
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Value at `index`, zero when not stored
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(idx, _)| *idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dense copy of the row
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(idx, value) in &self.entries {
            dense[idx] = value;
        }
        dense
    }
}
