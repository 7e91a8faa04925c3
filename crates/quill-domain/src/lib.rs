//! Quill Domain Layer
//!
//! Core vocabulary for post enrichment. This crate has ZERO external
//! dependencies: it defines the metadata schema attached to every post and
//! the trait boundary to the text-completion service, and nothing else.
//!
//! ## Key Concepts
//!
//! - **Metadata**: line count, detected language and up to two topical tags
//! - **Language**: binary English/French classification
//! - **Tag**: one of six fixed topical categories, each with trigger keywords
//! - **CompletionProvider**: the injectable `text in, text out` capability
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure implementations (HTTP clients, mocks) live in `quill-llm`
//! - The enrichment pipeline lives in `quill-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod metadata;
pub mod tag;
pub mod traits;

// Re-exports for convenience
pub use metadata::{Language, Metadata, MAX_TAGS};
pub use tag::{Tag, KEYWORD_TABLE};
pub use traits::{ClassifiedError, CompletionProvider, FailureClass};
