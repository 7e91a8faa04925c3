//! Error types for the Extractor

use quill_domain::{ClassifiedError, FailureClass};
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion provider error
    #[error("LLM error: {message}")]
    Completion {
        /// Provider's error message
        message: String,
        /// Provider's own classification of the failure
        class: FailureClass,
    },

    /// The response contained no `{...}` object
    #[error("No valid object found in response")]
    NoObjectFound,

    /// The extracted object ends early or lacks a value
    #[error("Invalid JSON output: {0}")]
    InvalidJson(String),

    /// Any other syntax error in the extracted object
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    /// Valid JSON that does not fit the metadata schema
    #[error("Invalid metadata format: {0}")]
    InvalidFormat(String),

    /// A post record that cannot be enriched
    #[error("Malformed post: {0}")]
    MalformedPost(String),

    /// Input dataset is not a collection of posts
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Dataset read or write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractorError {
    /// Wrap a provider error, keeping its classification
    pub fn completion<E: ClassifiedError>(error: &E) -> Self {
        ExtractorError::Completion {
            message: error.to_string(),
            class: error.class(),
        }
    }

    /// Decide whether another attempt may succeed.
    ///
    /// A provider that classified its own failure is trusted. Otherwise the
    /// lowercased message is matched against `patterns` (lowercase
    /// substrings).
    pub fn is_retryable<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        if let ExtractorError::Completion { class, .. } = self {
            match class {
                FailureClass::Transient => return true,
                FailureClass::Permanent => return false,
                FailureClass::Unknown => {}
            }
        }
        let message = self.to_string().to_lowercase();
        patterns
            .iter()
            .any(|pattern| message.contains(&pattern.as_ref().to_lowercase()))
    }
}
