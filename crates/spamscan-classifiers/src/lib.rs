//! SpamScan Classifiers
//!
//! The prediction pipeline behind SpamScan:
//! - Tokenizer resource bootstrap with bounded retries
//! - Text preprocessing (word tokenization, stemming, rejoining)
//! - TF-IDF vectorization and random-forest classification over JSON
//!   artifact exports
//! - The prediction service tying them together
//!
//! Artifacts are loaded once and shared read-only; nothing in this crate
//! depends on the user interface.

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod forest;
pub mod preprocess;
pub mod resource;
pub mod service;
pub mod stemmer;
pub mod tfidf;
pub mod tokenizer;

pub use artifacts::{ArtifactPaths, ArtifactStore};
pub use classifier::{Classifier, FeatureVector, Vectorizer};
pub use config::{ClassifierConfig, TokenizerConfig};
pub use forest::{DecisionTree, ForestSpec, RandomForest};
pub use preprocess::TextPreprocessor;
pub use resource::{
    BootstrapOutcome, HubFetcher, LocalFetcher, ResourceBootstrapper, ResourceFetcher,
    RetryPolicy, TokenizerResource,
};
pub use service::PredictionService;
pub use stemmer::{StemmerKind, TokenStemmer};
pub use tfidf::{Norm, TfidfSpec, TfidfVectorizer};
pub use tokenizer::WordTokenizer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ArtifactPaths, ArtifactStore};
    pub use crate::classifier::{Classifier, FeatureVector, Vectorizer};
    pub use crate::preprocess::TextPreprocessor;
    pub use crate::resource::ResourceBootstrapper;
    pub use crate::service::PredictionService;
}
