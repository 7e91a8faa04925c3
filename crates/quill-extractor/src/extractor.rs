//! Single-shot metadata extraction through the completion provider

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use quill_domain::{CompletionProvider, Metadata};
use tracing::debug;

/// Extracts metadata for one post with one completion call
///
/// No retrying happens here; see [`RetryController`](crate::RetryController).
pub struct MetadataExtractor<P>
where
    P: CompletionProvider,
{
    provider: P,
    max_post_chars: usize,
}

impl<P> MetadataExtractor<P>
where
    P: CompletionProvider,
{
    /// Create a new extractor
    pub fn new(provider: P, config: &ExtractorConfig) -> Self {
        Self {
            provider,
            max_post_chars: config.max_post_chars,
        }
    }

    /// Extract metadata from post text
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::Completion`] when the provider call fails
    /// - [`ExtractorError::NoObjectFound`] when the reply holds no object
    /// - [`ExtractorError::InvalidJson`], [`ExtractorError::MalformedJson`] or
    ///   [`ExtractorError::InvalidFormat`] when the object does not decode
    ///   into the metadata schema
    pub fn extract(&self, post_text: &str) -> Result<Metadata, ExtractorError> {
        let prompt = PromptBuilder::new(post_text, self.max_post_chars).build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .provider
            .complete(&prompt)
            .map_err(|e| ExtractorError::completion(&e))?;

        debug!(
            "Response from {}: {} chars",
            self.provider.model_name(),
            response.len()
        );

        parse_response(&response)
    }
}
