//! Tokenizer resource bootstrap
//!
//! The word tokenizer needs a `tokenizer.json` resource on local disk. On a
//! fresh machine it is downloaded from the Hugging Face Hub on first use.
//! Download failures are retried a fixed number of times and then absorbed:
//! [`ResourceBootstrapper::ensure`] never fails, and a resource that never
//! arrived surfaces later as [`Error::ResourceMissing`] from
//! [`ResourceBootstrapper::locate`].

use hf_hub::{api::sync::ApiBuilder, Cache, Repo, RepoType};
use serde::{Deserialize, Serialize};
use spamscan_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A named tokenizer resource on the Hugging Face Hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerResource {
    /// Repository holding the tokenizer
    pub repo_id: String,

    /// Branch, tag or commit
    pub revision: String,

    /// File inside the repository
    pub filename: String,
}

impl Default for TokenizerResource {
    fn default() -> Self {
        Self {
            repo_id: "bert-base-cased".to_string(),
            revision: "main".to_string(),
            filename: "tokenizer.json".to_string(),
        }
    }
}

impl TokenizerResource {
    /// Human-readable resource name, e.g. `bert-base-cased/tokenizer.json`
    pub fn name(&self) -> String {
        format!("{}/{}", self.repo_id, self.filename)
    }

    fn repo(&self) -> Repo {
        Repo::with_revision(self.repo_id.clone(), RepoType::Model, self.revision.clone())
    }
}

/// Where a resource can be found and how it is downloaded
pub trait ResourceFetcher: Send + Sync {
    /// Path of the resource if it is already on local disk
    fn locate(&self, resource: &TokenizerResource) -> Option<PathBuf>;

    /// Download the resource and return its local path
    fn fetch(&self, resource: &TokenizerResource) -> Result<PathBuf>;
}

/// Fetches resources into a Hugging Face Hub cache.
///
/// hf-hub downloads into a temporary file and renames it into place, so
/// overlapping fetches of the same file leave a complete copy behind.
#[derive(Debug, Clone, Default)]
pub struct HubFetcher {
    cache_dir: Option<PathBuf>,
}

impl HubFetcher {
    /// Fetcher using the default hf-hub cache (`HF_HOME` aware)
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher using an explicit cache directory
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(cache_dir.into()),
        }
    }

    fn cache(&self) -> Cache {
        match &self.cache_dir {
            Some(dir) => Cache::new(dir.clone()),
            None => Cache::default(),
        }
    }
}

impl ResourceFetcher for HubFetcher {
    fn locate(&self, resource: &TokenizerResource) -> Option<PathBuf> {
        self.cache().repo(resource.repo()).get(&resource.filename)
    }

    fn fetch(&self, resource: &TokenizerResource) -> Result<PathBuf> {
        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(dir) = &self.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }

        let api = builder
            .build()
            .map_err(|e| Error::resource_fetch(format!("failed to initialize HF API: {}", e)))?;

        api.repo(resource.repo())
            .get(&resource.filename)
            .map_err(|e| {
                Error::resource_fetch(format!("failed to download {}: {}", resource.name(), e))
            })
    }
}

/// A resource provisioned by hand on local disk; never downloaded
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    path: PathBuf,
}

impl LocalFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResourceFetcher for LocalFetcher {
    fn locate(&self, _resource: &TokenizerResource) -> Option<PathBuf> {
        self.path.is_file().then(|| self.path.clone())
    }

    fn fetch(&self, _resource: &TokenizerResource) -> Result<PathBuf> {
        Err(Error::resource_fetch(format!(
            "local tokenizer {} does not exist and cannot be downloaded",
            self.path.display()
        )))
    }
}

/// Bounded retry for the one-time fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fetch attempts before giving up
    pub max_attempts: u32,

    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Result of [`ResourceBootstrapper::ensure`].
///
/// Callers may ignore it; an unavailable resource is reported again, as an
/// error, by the first lookup that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Resource was already on disk
    AlreadyPresent(PathBuf),

    /// Resource was downloaded
    Fetched { path: PathBuf, attempts: u32 },

    /// Every attempt failed
    Unavailable { attempts: u32, last_error: String },
}

impl BootstrapOutcome {
    /// Check whether the resource is on disk
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    /// Local path of the resource, if available
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::AlreadyPresent(path) | Self::Fetched { path, .. } => Some(path),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Makes sure the tokenizer resource exists locally
pub struct ResourceBootstrapper {
    resource: TokenizerResource,
    fetcher: Arc<dyn ResourceFetcher>,
    policy: RetryPolicy,
}

impl ResourceBootstrapper {
    /// Create a bootstrapper with the default retry policy
    pub fn new(resource: TokenizerResource, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            resource,
            fetcher,
            policy: RetryPolicy::default(),
        }
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The managed resource
    pub fn resource(&self) -> &TokenizerResource {
        &self.resource
    }

    /// Current retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Check for the resource and fetch it when absent.
    ///
    /// Idempotent and cheap once the resource is present. Fetch errors are
    /// logged and folded into [`BootstrapOutcome::Unavailable`].
    pub fn ensure(&self) -> BootstrapOutcome {
        if let Some(path) = self.fetcher.locate(&self.resource) {
            debug!("Tokenizer resource {} present at {:?}", self.resource.name(), path);
            return BootstrapOutcome::AlreadyPresent(path);
        }

        info!("Tokenizer resource {} not found locally, fetching", self.resource.name());

        let mut last_error = String::from("no fetch attempted");
        for attempt in 1..=self.policy.max_attempts {
            match self.fetcher.fetch(&self.resource) {
                Ok(path) => {
                    info!(
                        "Fetched tokenizer resource {} to {:?} (attempt {})",
                        self.resource.name(),
                        path,
                        attempt
                    );
                    return BootstrapOutcome::Fetched {
                        path,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to fetch {} failed: {}",
                        attempt,
                        self.policy.max_attempts,
                        self.resource.name(),
                        e
                    );
                    last_error = e.to_string();
                    if attempt < self.policy.max_attempts {
                        std::thread::sleep(self.policy.delay);
                    }
                }
            }
        }

        BootstrapOutcome::Unavailable {
            attempts: self.policy.max_attempts,
            last_error,
        }
    }

    /// Direct lookup without fetching
    pub fn locate(&self) -> Result<PathBuf> {
        self.fetcher
            .locate(&self.resource)
            .ok_or_else(|| Error::resource_missing(self.resource.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fetcher that fails a fixed number of times before succeeding
    struct FlakyFetcher {
        failures_before_success: u32,
        attempts: AtomicU32,
        stored: Mutex<Option<PathBuf>>,
    }

    impl FlakyFetcher {
        fn new(failures_before_success: u32) -> Self {
            Self {
                failures_before_success,
                attempts: AtomicU32::new(0),
                stored: Mutex::new(None),
            }
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::Relaxed)
        }
    }

    impl ResourceFetcher for FlakyFetcher {
        fn locate(&self, _resource: &TokenizerResource) -> Option<PathBuf> {
            self.stored.lock().clone()
        }

        fn fetch(&self, _resource: &TokenizerResource) -> Result<PathBuf> {
            let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
            if attempt <= self.failures_before_success {
                return Err(Error::resource_fetch("connection reset"));
            }
            let path = PathBuf::from("/cache/tokenizer.json");
            *self.stored.lock() = Some(path.clone());
            Ok(path)
        }
    }

    fn bootstrapper(fetcher: Arc<FlakyFetcher>) -> ResourceBootstrapper {
        ResourceBootstrapper::new(TokenizerResource::default(), fetcher).with_retry_policy(
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::ZERO,
            },
        )
    }

    #[test]
    fn test_fetches_after_transient_failures() {
        let fetcher = Arc::new(FlakyFetcher::new(2));
        let outcome = bootstrapper(fetcher.clone()).ensure();

        assert_eq!(
            outcome,
            BootstrapOutcome::Fetched {
                path: PathBuf::from("/cache/tokenizer.json"),
                attempts: 3
            }
        );
        assert_eq!(fetcher.attempts(), 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts_without_error() {
        let fetcher = Arc::new(FlakyFetcher::new(10));
        let boot = bootstrapper(fetcher.clone());

        let outcome = boot.ensure();
        assert!(!outcome.is_available());
        assert!(outcome.path().is_none());
        assert_eq!(fetcher.attempts(), 3);

        match boot.locate() {
            Err(Error::ResourceMissing { resource }) => {
                assert_eq!(resource, "bert-base-cased/tokenizer.json")
            }
            other => panic!("expected ResourceMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_is_idempotent_once_present() {
        let fetcher = Arc::new(FlakyFetcher::new(0));
        let boot = bootstrapper(fetcher.clone());

        assert!(matches!(boot.ensure(), BootstrapOutcome::Fetched { attempts: 1, .. }));
        assert!(matches!(boot.ensure(), BootstrapOutcome::AlreadyPresent(_)));
        assert!(matches!(boot.ensure(), BootstrapOutcome::AlreadyPresent(_)));
        assert_eq!(fetcher.attempts(), 1);
        assert!(boot.locate().is_ok());
    }

    #[test]
    fn test_waits_between_attempts_only() {
        let fetcher = Arc::new(FlakyFetcher::new(10));
        let boot = ResourceBootstrapper::new(TokenizerResource::default(), fetcher)
            .with_retry_policy(RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(30),
            });

        let start = std::time::Instant::now();
        let _ = boot.ensure();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(60));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[test]
    fn test_local_fetcher() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        let fetcher = LocalFetcher::new(&path);
        let resource = TokenizerResource::default();

        assert!(fetcher.locate(&resource).is_none());
        assert!(matches!(fetcher.fetch(&resource), Err(Error::ResourceFetch(_))));

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(fetcher.locate(&resource), Some(path));
    }

    #[test]
    fn test_hub_fetcher_misses_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HubFetcher::with_cache_dir(dir.path());
        assert!(fetcher.locate(&TokenizerResource::default()).is_none());
    }
}
