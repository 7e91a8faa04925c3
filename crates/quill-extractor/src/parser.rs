//! Parse completion output into metadata
//!
//! Models are told to answer with a bare JSON object but routinely wrap it
//! in a markdown fence or surround it with prose. [`extract_json_object`]
//! digs the object out; [`parse_metadata`] decodes it strictly.
//!
//! Known limitation: brace matching is textual. A `{` or `}` inside a JSON
//! string literal is counted like any other brace, and only one level of
//! nesting is recognised by the balanced-brace strategy.

use crate::error::ExtractorError;
use crate::types::MetadataRecord;
use once_cell::sync::Lazy;
use quill_domain::Metadata;
use regex::Regex;
use serde_json::error::Category;

/// A fenced block, optionally labelled `json`, holding one `{...}` object
static FENCED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```(?:json)?\s*(\{.*?\})\s*```").unwrap());

/// A `{...}` span whose braces balance, allowing one level of nesting
static BALANCED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap());

/// Extract the most plausible JSON object from free-form text.
///
/// Strategies, first success wins:
/// 1. the contents of a fenced code block
/// 2. the longest balanced-brace span (earliest on ties)
/// 3. everything from the first `{` to the last `}`
///
/// Any text with a `{` before a `}` contains at least one innermost
/// brace pair, so strategy 3 only matters if strategy 2 is ever narrowed.
pub fn extract_json_object(text: &str) -> Option<String> {
    if let Some(captures) = FENCED_OBJECT.captures(text) {
        return Some(captures[1].trim().to_string());
    }

    let longest = BALANCED_OBJECT
        .find_iter(text)
        .map(|m| m.as_str())
        .fold(None::<&str>, |best, candidate| match best {
            Some(best) if best.chars().count() >= candidate.chars().count() => Some(best),
            _ => Some(candidate),
        });
    if let Some(object) = longest {
        return Some(object.trim().to_string());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        return Some(text[start..=end].trim().to_string());
    }
    None
}

/// Strictly decode an extracted object into metadata.
///
/// Truncated input and a missing value are reported as
/// [`ExtractorError::InvalidJson`], other syntax errors as
/// [`ExtractorError::MalformedJson`]. Well-formed JSON with missing or
/// mistyped fields is [`ExtractorError::InvalidFormat`].
pub fn parse_metadata(json_str: &str) -> Result<Metadata, ExtractorError> {
    let record: MetadataRecord = serde_json::from_str(json_str).map_err(decode_error)?;
    record.into_metadata()
}

fn decode_error(e: serde_json::Error) -> ExtractorError {
    let message = e.to_string();
    match e.classify() {
        Category::Data => ExtractorError::InvalidFormat(message),
        Category::Eof | Category::Io => ExtractorError::InvalidJson(message),
        Category::Syntax if message.starts_with("expected value") => ExtractorError::InvalidJson(message),
        Category::Syntax => ExtractorError::MalformedJson(message),
    }
}

/// Parse a raw completion into metadata
pub fn parse_response(response: &str) -> Result<Metadata, ExtractorError> {
    let json_str = extract_json_object(response.trim()).ok_or(ExtractorError::NoObjectFound)?;
    parse_metadata(&json_str)
}
