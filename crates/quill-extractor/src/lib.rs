//! Quill Extractor
//!
//! Enriches a collection of posts with line count, language and topic tags,
//! asking a completion model first and falling back to local heuristics.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor → sanitize → RetryController → MetadataExtractor → LLM
//!                                   │                   │
//!                                   │             parse_response
//!                                   ▼
//!                          FallbackGenerator (on exhaustion)
//! ```
//!
//! Every post yields exactly one enriched record, in input order. Failures
//! only ever degrade metadata quality; they never abort the batch.
//!
//! # Example Usage
//!
//! ```no_run
//! use quill_extractor::{BatchProcessor, ExtractorConfig};
//! use quill_llm::MockProvider;
//! use serde_json::json;
//!
//! let llm = MockProvider::new(r#"{"line_count": 1, "language": "English", "tags": ["tech"]}"#);
//! let processor = BatchProcessor::new(llm, ExtractorConfig::default());
//!
//! let outcome = processor.process(vec![json!({"text": "Shipping our new AI feature today"})]);
//!
//! println!("{}", outcome.metrics.summary());
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod extractor;
mod fallback;
mod io;
mod metrics;
mod parser;
mod prompt;
mod retry;
mod sanitize;
mod types;


pub use batch::{merge, BatchProcessor, TEXT_FIELD};
pub use config::{ExtractorConfig, OutputEncoding};
pub use error::ExtractorError;
pub use extractor::MetadataExtractor;
pub use fallback::{
    count_lines, detect_language, fallback_metadata, match_tags, FallbackGenerator,
    FRENCH_FUNCTION_WORDS,
};
pub use io::{load_posts, render, write_posts};
pub use metrics::BatchMetrics;
pub use parser::{extract_json_object, parse_metadata, parse_response};
pub use prompt::{truncate_chars, PromptBuilder, TRUNCATION_MARKER};
pub use retry::{RecordingSleeper, RetryController, Sleeper, ThreadSleeper};
pub use sanitize::{
    sanitize_bytes, sanitize_json_text, sanitize_map, sanitize_str, sanitize_utf16,
    sanitize_value,
};
pub use types::{BatchOutcome, EnrichedPost, MetadataRecord, Provenance, RetryOutcome};
