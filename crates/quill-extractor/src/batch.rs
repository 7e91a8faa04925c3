//! Sequential batch enrichment

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::io::{load_posts, write_posts};
use crate::metrics::BatchMetrics;
use crate::retry::{RetryController, Sleeper, ThreadSleeper};
use crate::sanitize::{sanitize_map, sanitize_str};
use crate::types::{BatchOutcome, EnrichedPost, MetadataRecord, Provenance, RetryOutcome};
use quill_domain::{CompletionProvider, Metadata};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{error, info};

/// Field holding the post body
pub const TEXT_FIELD: &str = "text";

/// Enriches every post of a collection, in order, one at a time
///
/// A post that cannot be enriched is never dropped; it gets degenerate
/// metadata instead and processing moves on.
pub struct BatchProcessor<P, S = ThreadSleeper>
where
    P: CompletionProvider,
    S: Sleeper,
{
    controller: RetryController<P, S>,
}

impl<P> BatchProcessor<P, ThreadSleeper>
where
    P: CompletionProvider,
{
    /// Create a processor that really sleeps between attempts
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self::from_controller(RetryController::new(provider, config))
    }
}

impl<P, S> BatchProcessor<P, S>
where
    P: CompletionProvider,
    S: Sleeper,
{
    /// Create a processor around an existing retry controller
    pub fn from_controller(controller: RetryController<P, S>) -> Self {
        Self { controller }
    }

    /// The retry controller in use
    pub fn controller(&self) -> &RetryController<P, S> {
        &self.controller
    }

    /// Enrich `posts`, returning exactly one record per post in input order
    pub fn process(&self, posts: Vec<Value>) -> BatchOutcome {
        let total = posts.len();
        let mut metrics = BatchMetrics::new();
        let mut enriched = Vec::with_capacity(total);
        let mut provenance = Vec::with_capacity(total);

        for (i, post) in posts.into_iter().enumerate() {
            match self.enrich(post) {
                Ok((record, outcome)) => {
                    metrics.record_outcome(&outcome);
                    provenance.push(outcome.provenance);
                    enriched.push(record);
                }
                Err((post, e)) => {
                    error!("Error processing post {}: {}", i + 1, e);
                    metrics.record_item_failure();
                    provenance.push(Provenance::ItemFallback);
                    enriched.push(self.item_fallback(post));
                }
            }
            info!("Processed post {}/{}", i + 1, total);
        }

        let posts = enriched.into_iter().map(sanitize_map).collect();

        BatchOutcome {
            posts,
            provenance,
            metrics,
        }
    }

    /// Load posts from `input`, enrich them and write the result to `output`
    ///
    /// # Errors
    ///
    /// Only an unreadable input or unwritable output fails the run.
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<BatchOutcome, ExtractorError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let posts = load_posts(input)?;
        info!("Loaded {} posts from {}", posts.len(), input.display());

        let outcome = self.process(posts);

        let encoding = write_posts(output, &outcome.posts, self.controller.config().output_encoding)?;
        info!(
            "Wrote {} posts to {} ({:?})",
            outcome.posts.len(),
            output.display(),
            encoding
        );

        Ok(outcome)
    }

    /// Enrich one post; on failure the post is handed back for the fallback
    /// record
    fn enrich(&self, post: Value) -> Result<(EnrichedPost, RetryOutcome), (Value, ExtractorError)> {
        let mut fields = match post {
            Value::Object(fields) => fields,
            other => {
                let e = ExtractorError::MalformedPost(format!("expected an object, got {}", kind(&other)));
                return Err((other, e));
            }
        };

        let text = match fields.get(TEXT_FIELD) {
            Some(Value::String(text)) => sanitize_str(text).into_owned(),
            Some(other) => {
                let e = ExtractorError::MalformedPost(format!(
                    "'{}' must be a string, got {}",
                    TEXT_FIELD,
                    kind(other)
                ));
                return Err((Value::Object(fields), e));
            }
            None => {
                let e = ExtractorError::MalformedPost(format!("missing '{}' field", TEXT_FIELD));
                return Err((Value::Object(fields), e));
            }
        };

        let outcome = self.controller.run(&text);
        fields.insert(TEXT_FIELD.to_string(), Value::String(text));

        Ok((merge(fields, &outcome.metadata), outcome))
    }

    /// Record for a post that could not be enriched: its original fields, if
    /// any, plus degenerate metadata from whatever text survives
    fn item_fallback(&self, post: Value) -> EnrichedPost {
        let fields = match post {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        let text = fields
            .get(TEXT_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let metadata = self.controller.fallback().degenerate(text);
        merge(fields, &metadata)
    }
}

/// Shallow merge; metadata fields replace any same-named post fields
pub fn merge(mut post: Map<String, Value>, metadata: &Metadata) -> EnrichedPost {
    post.extend(MetadataRecord::from(metadata).to_fields());
    post
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
