//! Loading of the pretrained vectorizer and classifier artifacts

use crate::classifier::{Classifier, Vectorizer};
use crate::forest::{ForestSpec, RandomForest};
use crate::stemmer::StemmerKind;
use crate::tfidf::{TfidfSpec, TfidfVectorizer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spamscan_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Locations of the two artifact files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// TF-IDF vectorizer export
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer: PathBuf,

    /// Random-forest export
    #[serde(default = "default_classifier_path")]
    pub classifier: PathBuf,
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from("./models/tfidf_vectorizer.json")
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("./models/random_forest.json")
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            vectorizer: default_vectorizer_path(),
            classifier: default_classifier_path(),
        }
    }
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join("tfidf_vectorizer.json"),
            classifier: dir.join("random_forest.json"),
        }
    }

    /// Set the vectorizer path
    pub fn with_vectorizer(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectorizer = path.into();
        self
    }

    /// Set the classifier path
    pub fn with_classifier(mut self, path: impl Into<PathBuf>) -> Self {
        self.classifier = path.into();
        self
    }
}

/// The loaded, immutable artifacts.
///
/// Loaded once at startup and shared by `Arc`; nothing here is ever
/// reloaded or mutated.
pub struct ArtifactStore {
    vectorizer: Arc<TfidfVectorizer>,
    classifier: Arc<RandomForest>,
    paths: ArtifactPaths,
}

impl ArtifactStore {
    /// Load and cross-check both artifacts
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let vectorizer_spec: TfidfSpec = read_artifact(&paths.vectorizer)?;
        let vectorizer = TfidfVectorizer::from_spec(vectorizer_spec)
            .map_err(|e| Error::artifact(&paths.vectorizer, e.to_string()))?;

        let classifier_spec: ForestSpec = read_artifact(&paths.classifier)?;
        let classifier = RandomForest::from_spec(classifier_spec)
            .map_err(|e| Error::artifact(&paths.classifier, e.to_string()))?;

        if Classifier::n_features(&classifier) != Vectorizer::n_features(&vectorizer) {
            return Err(Error::artifact(
                &paths.classifier,
                format!(
                    "classifier expects {} features but the vectorizer produces {}",
                    Classifier::n_features(&classifier),
                    Vectorizer::n_features(&vectorizer)
                ),
            ));
        }

        info!(
            "Loaded vectorizer ({} terms) from {:?}",
            Vectorizer::n_features(&vectorizer),
            paths.vectorizer
        );
        info!(
            "Loaded classifier ({} trees) from {:?}",
            classifier.tree_count(),
            paths.classifier
        );

        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            classifier: Arc::new(classifier),
            paths: paths.clone(),
        })
    }

    /// Shared handle to the vectorizer
    pub fn vectorizer(&self) -> Arc<dyn Vectorizer> {
        self.vectorizer.clone()
    }

    /// Shared handle to the classifier
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        self.classifier.clone()
    }

    /// Stemmer the vectorizer vocabulary was fitted with
    pub fn stemmer(&self) -> StemmerKind {
        self.vectorizer.spec().stemmer
    }

    /// Where the artifacts were loaded from
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }
}

/// Read and deserialize one JSON artifact, tagging failures with its path
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::artifact(path, "file not found"));
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e.to_string()))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::artifact(path, format!("corrupt artifact: {}", e)))
}
