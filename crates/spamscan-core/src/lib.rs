//! SpamScan Core
//!
//! Core types and error handling shared across SpamScan components.
//!
//! This crate provides:
//! - The error taxonomy used by the classifier pipeline and the UI
//! - Prediction labels and results
//! - The blank-input guard applied before any prediction

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{EmailText, Label, PredictionResult, HAM_CLASS, SPAM_CLASS};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{EmailText, Label, PredictionResult};
}
