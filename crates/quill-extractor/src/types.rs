//! Request and response types for extraction

use crate::error::ExtractorError;
use crate::metrics::BatchMetrics;
use quill_domain::{Language, Metadata, Tag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// A post after enrichment: the original fields plus the metadata fields
pub type EnrichedPost = Map<String, Value>;

/// Where a post's metadata came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Produced by the completion model
    Model,
    /// Produced by the local heuristic after the model path gave up
    Fallback,
    /// The post itself could not be processed; degenerate metadata substituted
    ItemFallback,
}

/// Result of running the retry controller for one post
#[derive(Debug, Clone)]
pub struct RetryOutcome {
    /// The metadata, always schema-valid
    pub metadata: Metadata,

    /// Which path produced it
    pub provenance: Provenance,

    /// Completion attempts made
    pub attempts: u32,

    /// Total time spent backing off between attempts
    pub backoff: Duration,

    /// Message of the last failure, if any
    pub last_error: Option<String>,
}

/// Result of processing a batch of posts
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Enriched posts, one per input post, in input order
    pub posts: Vec<EnrichedPost>,

    /// Provenance of each post's metadata, aligned with `posts`
    pub provenance: Vec<Provenance>,

    /// Counters for the run
    pub metrics: BatchMetrics,
}

/// Wire representation of [`Metadata`]
///
/// Decoding is strict about types: `line_count` must be a non-negative
/// integer, `language` a string and `tags` an array of strings, and all
/// three must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Number of lines
    pub line_count: usize,

    /// Language name
    pub language: String,

    /// Tag labels
    pub tags: Vec<String>,
}

impl From<&Metadata> for MetadataRecord {
    fn from(metadata: &Metadata) -> Self {
        Self {
            line_count: metadata.line_count,
            language: metadata.language.as_str().to_string(),
            tags: metadata.tag_names().into_iter().map(String::from).collect(),
        }
    }
}

impl MetadataRecord {
    /// Convert into validated metadata.
    ///
    /// The language must be English or French. Tag labels are mapped onto the
    /// fixed categories with [`Tag::from_label`]; labels that match no
    /// category are dropped, duplicates removed, and the list capped.
    pub fn into_metadata(self) -> Result<Metadata, ExtractorError> {
        let language = Language::parse(&self.language).ok_or_else(|| {
            ExtractorError::InvalidFormat(format!("unsupported language '{}'", self.language))
        })?;

        let mut tags = Vec::with_capacity(self.tags.len());
        for label in &self.tags {
            match Tag::from_label(label) {
                Some(tag) => tags.push(tag),
                None => debug!("Dropping unrecognised tag '{}'", label),
            }
        }

        Ok(Metadata::new(self.line_count, language, tags))
    }

    /// The record as JSON object fields
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("line_count".to_string(), Value::from(self.line_count));
        fields.insert("language".to_string(), Value::from(self.language.clone()));
        fields.insert(
            "tags".to_string(),
            Value::Array(self.tags.iter().cloned().map(Value::from).collect()),
        );
        fields
    }
}
