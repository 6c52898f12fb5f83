//! Error types for SpamScan

use std::path::PathBuf;

/// Result type alias using SpamScan's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SpamScan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single attempt to fetch the tokenizer resource failed
    #[error("resource fetch failed: {0}")]
    ResourceFetch(String),

    /// The tokenizer resource is not available locally
    #[error("resource not found: {resource}")]
    ResourceMissing { resource: String },

    /// A model artifact could not be loaded at startup
    #[error("failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// The submitted email text was blank
    #[error("email text is empty")]
    EmptyInput,

    /// Preprocessing, vectorization or classification failed
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new resource fetch error
    pub fn resource_fetch(msg: impl Into<String>) -> Self {
        Self::ResourceFetch(msg.into())
    }

    /// Create a new missing resource error
    pub fn resource_missing(resource: impl Into<String>) -> Self {
        Self::ResourceMissing {
            resource: resource.into(),
        }
    }

    /// Create a new artifact load error
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable short name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceFetch(_) => "resource_fetch",
            Self::ResourceMissing { .. } => "resource_missing",
            Self::ArtifactLoad { .. } => "artifact_load",
            Self::EmptyInput => "empty_input",
            Self::Prediction(_) => "prediction",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}
