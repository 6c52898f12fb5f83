//! Core types for SpamScan

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw class index the classifier emits for spam
pub const SPAM_CLASS: u8 = 1;

/// Raw class index the classifier emits for ham
pub const HAM_CLASS: u8 = 0;

/// Verdict for a single email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Unsolicited or malicious mail
    Spam,
    /// Legitimate mail
    Ham,
}

impl Label {
    /// Map a raw classifier output onto a label.
    ///
    /// Only `1` (spam) and `0` (ham) are valid; anything else means the
    /// classifier artifact does not match this application.
    pub fn from_class(class: u8) -> Result<Self> {
        match class {
            SPAM_CLASS => Ok(Self::Spam),
            HAM_CLASS => Ok(Self::Ham),
            other => Err(Error::prediction(format!(
                "classifier returned unknown class {}",
                other
            ))),
        }
    }

    /// Raw class index for this label
    pub fn class(&self) -> u8 {
        match self {
            Self::Spam => SPAM_CLASS,
            Self::Ham => HAM_CLASS,
        }
    }

    /// Short name, used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Ham => "ham",
        }
    }

    /// Text shown to the user
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spam => "SPAM",
            Self::Ham => "NOT SPAM (HAM)",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of classifying one email
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted label
    pub label: Label,

    /// Probability of the predicted label, as a percentage (0.0-100.0)
    pub confidence: f64,
}

impl PredictionResult {
    /// Build a result from the predicted class and the class distribution.
    ///
    /// The confidence is the probability of `class` itself, never of a fixed
    /// class.
    pub fn from_distribution(class: u8, probabilities: &[f64]) -> Result<Self> {
        let label = Label::from_class(class)?;
        let probability = probabilities.get(class as usize).copied().ok_or_else(|| {
            Error::prediction(format!(
                "probability distribution has {} entries, no entry for class {}",
                probabilities.len(),
                class
            ))
        })?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(Error::prediction(format!(
                "probability {} for class {} is outside [0, 1]",
                probability, class
            )));
        }

        Ok(Self {
            label,
            confidence: probability * 100.0,
        })
    }

    /// Check whether the email was classified as spam
    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }

    /// Confidence rendered with two decimals, e.g. `97.25%`
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

/// Email text that passed the blank-input guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailText<'a>(&'a str);

impl<'a> EmailText<'a> {
    /// Accept the text unless it is empty after trimming.
    ///
    /// The original text is kept untrimmed.
    pub fn parse(raw: &'a str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self(raw))
    }

    /// The accepted text
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}
