//! Word tokenization backed by a `tokenizer.json` resource
//!
//! Only the resource's pre-tokenizer is used: it splits text on whitespace
//! and punctuation and keeps the original casing. Subword models and
//! normalizers in the file are ignored.
//!
//! Apostrophes are punctuation like any other, so contractions split
//! around them: `don't` becomes `don ' t` and `Let's` becomes `Let ' s`.
//! Vocabularies must be fitted with the same splitting.

use spamscan_core::{Error, Result};
use std::path::Path;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::pre_tokenizers::PreTokenizerWrapper;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer};

/// Splits text into word and punctuation tokens
#[derive(Clone)]
pub struct WordTokenizer {
    pre_tokenizer: PreTokenizerWrapper,
}

impl WordTokenizer {
    /// Load the pre-tokenizer from a `tokenizer.json` file.
    ///
    /// Files without a pre-tokenizer fall back to BERT word splitting.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            Error::prediction(format!("failed to load tokenizer {}: {}", path.display(), e))
        })?;

        let pre_tokenizer = tokenizer
            .get_pre_tokenizer()
            .cloned()
            .unwrap_or_else(|| PreTokenizerWrapper::BertPreTokenizer(BertPreTokenizer));

        Ok(Self { pre_tokenizer })
    }

    /// BERT-style word splitting without a resource file
    pub fn bert() -> Self {
        Self {
            pre_tokenizer: PreTokenizerWrapper::BertPreTokenizer(BertPreTokenizer),
        }
    }

    /// Tokens of `text` in order; blank input yields no tokens
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut pretokenized = PreTokenizedString::from(text);
        self.pre_tokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| Error::prediction(format!("tokenization failed: {}", e)))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(token, _, _)| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect())
    }
}
