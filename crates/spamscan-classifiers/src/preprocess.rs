//! Text preprocessing: tokenize, stem, rejoin

use crate::resource::ResourceBootstrapper;
use crate::stemmer::{StemmerKind, TokenStemmer};
use crate::tokenizer::WordTokenizer;
use parking_lot::Mutex;
use spamscan_core::Result;
use std::sync::Arc;
use tracing::debug;

/// Turns raw email text into the space-joined stem string the vectorizer
/// was fitted on
pub struct TextPreprocessor {
    bootstrapper: Arc<ResourceBootstrapper>,
    tokenizer: Mutex<Option<Arc<WordTokenizer>>>,
    stemmer: TokenStemmer,
}

impl TextPreprocessor {
    /// Create a Porter-stemming preprocessor; the tokenizer is loaded on
    /// first use
    pub fn new(bootstrapper: Arc<ResourceBootstrapper>) -> Self {
        Self {
            bootstrapper,
            tokenizer: Mutex::new(None),
            stemmer: TokenStemmer::new(StemmerKind::Porter),
        }
    }

    /// Use another stemming algorithm
    pub fn with_stemmer(mut self, kind: StemmerKind) -> Self {
        self.stemmer = TokenStemmer::new(kind);
        self
    }

    /// Stemming algorithm in use
    pub fn stemmer_kind(&self) -> StemmerKind {
        self.stemmer.kind()
    }

    /// Tokenize, stem each token, and join the stems with single spaces.
    ///
    /// Fails with `ResourceMissing` when the tokenizer resource is still
    /// absent after the bootstrap check.
    pub fn preprocess(&self, text: &str) -> Result<String> {
        // A resource that is still missing fails the lookup below.
        let _ = self.bootstrapper.ensure();

        let tokenizer = self.tokenizer()?;
        let stems: Vec<String> = tokenizer
            .tokenize(text)?
            .iter()
            .map(|token| self.stem(token))
            .filter(|stem| !stem.is_empty())
            .collect();

        Ok(stems.join(" "))
    }

    /// Stem one token; stemming lower-cases it
    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token)
    }

    fn tokenizer(&self) -> Result<Arc<WordTokenizer>> {
        let mut cached = self.tokenizer.lock();
        if let Some(tokenizer) = cached.as_ref() {
            return Ok(Arc::clone(tokenizer));
        }

        let path = self.bootstrapper.locate()?;
        debug!("Loading word tokenizer from {:?}", path);
        let tokenizer = Arc::new(WordTokenizer::from_file(&path)?);
        *cached = Some(Arc::clone(&tokenizer));
        Ok(tokenizer)
    }
}
