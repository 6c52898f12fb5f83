//! Configuration for artifact loading and the tokenizer resource

use crate::artifacts::ArtifactPaths;
use crate::resource::{
    HubFetcher, LocalFetcher, ResourceBootstrapper, ResourceFetcher, RetryPolicy,
    TokenizerResource,
};
use serde::{Deserialize, Serialize};
use spamscan_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the classification pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Artifact file locations
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    /// Tokenizer resource settings
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

impl ClassifierConfig {
    /// Parse and validate configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tokenizer.max_attempts < 1 {
            return Err(Error::config("tokenizer.max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }
}

/// Tokenizer resource settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Hugging Face repository holding the tokenizer
    #[serde(default = "default_repo_id")]
    pub repo_id: String,

    /// Repository revision
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Tokenizer file name
    #[serde(default = "default_filename")]
    pub filename: String,

    /// hf-hub cache directory (hf-hub default when unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Local tokenizer file; when set nothing is downloaded
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Fetch attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between fetch attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            repo_id: default_repo_id(),
            revision: default_revision(),
            filename: default_filename(),
            cache_dir: None,
            path: None,
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl TokenizerConfig {
    /// The configured resource
    pub fn resource(&self) -> TokenizerResource {
        TokenizerResource {
            repo_id: self.repo_id.clone(),
            revision: self.revision.clone(),
            filename: self.filename.clone(),
        }
    }

    /// The configured retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Local file when `path` is set, the hub cache otherwise
    pub fn fetcher(&self) -> Arc<dyn ResourceFetcher> {
        match (&self.path, &self.cache_dir) {
            (Some(path), _) => Arc::new(LocalFetcher::new(path)),
            (None, Some(dir)) => Arc::new(HubFetcher::with_cache_dir(dir)),
            (None, None) => Arc::new(HubFetcher::new()),
        }
    }

    /// Bootstrapper for the configured resource
    pub fn bootstrapper(&self) -> ResourceBootstrapper {
        ResourceBootstrapper::new(self.resource(), self.fetcher())
            .with_retry_policy(self.retry_policy())
    }
}

fn default_repo_id() -> String {
    TokenizerResource::default().repo_id
}

fn default_revision() -> String {
    TokenizerResource::default().revision
}

fn default_filename() -> String {
    TokenizerResource::default().filename
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_retry_delay_ms() -> u64 {
    RetryPolicy::default().delay.as_millis() as u64
}
