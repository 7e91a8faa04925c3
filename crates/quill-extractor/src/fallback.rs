//! Local heuristic metadata
//!
//! Used whenever the model path cannot deliver. Pure, deterministic and
//! infallible, and produces the same schema as the model path.

use crate::config::ExtractorConfig;
use quill_domain::{Language, Metadata, Tag, KEYWORD_TABLE, MAX_TAGS};

/// French function words counted by the language heuristic
pub const FRENCH_FUNCTION_WORDS: [&str; 12] = [
    "le", "la", "les", "de", "du", "des", "et", "est", "une", "un", "ce", "cette",
];

/// Heuristic metadata generator
#[derive(Debug, Clone, Copy)]
pub struct FallbackGenerator {
    french_word_threshold: usize,
    max_tags: usize,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self {
            french_word_threshold: 3,
            max_tags: MAX_TAGS,
        }
    }
}

impl FallbackGenerator {
    /// Create a generator with explicit thresholds
    pub fn new(french_word_threshold: usize, max_tags: usize) -> Self {
        Self {
            french_word_threshold,
            max_tags: max_tags.min(MAX_TAGS),
        }
    }

    /// Create a generator from extractor configuration
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.french_word_threshold, config.max_tags)
    }

    /// Derive metadata for `text`
    pub fn generate(&self, text: &str) -> Metadata {
        Metadata::new(
            count_lines(text),
            detect_language(text, self.french_word_threshold),
            match_tags(text, self.max_tags),
        )
    }

    /// Minimal metadata for a post that could not be processed at all:
    /// the line count of whatever text survived, English, no tags
    pub fn degenerate(&self, text: &str) -> Metadata {
        Metadata::new(count_lines(text), Language::English, Vec::new())
    }
}

/// Heuristic metadata with default thresholds
pub fn fallback_metadata(text: &str) -> Metadata {
    FallbackGenerator::default().generate(text)
}

/// Number of `\n`-delimited segments
pub fn count_lines(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// French when more than `threshold` lowercase word tokens are French
/// function words, English otherwise
pub fn detect_language(text: &str, threshold: usize) -> Language {
    let lowered = text.to_lowercase();
    let french_words = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| FRENCH_FUNCTION_WORDS.contains(word))
        .count();

    if french_words > threshold {
        Language::French
    } else {
        Language::English
    }
}

/// Tags whose trigger substrings occur in `text`, in table order, at most
/// `max_tags`
pub fn match_tags(text: &str, max_tags: usize) -> Vec<Tag> {
    let lowered = text.to_lowercase();
    let mut tags = Vec::new();

    for (tag, triggers) in KEYWORD_TABLE {
        if tags.len() >= max_tags {
            break;
        }
        if triggers.iter().any(|trigger| lowered.contains(trigger)) {
            tags.push(*tag);
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_line_count() {
        assert_eq!(count_lines(""), 1);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\ntwo\nthree"), 3);
        assert_eq!(count_lines("trailing\n"), 2);
    }

    #[test]
    fn test_french_function_words() {
        let text = "le la les de du des et est une un ce cette";
        assert_eq!(detect_language(text, 3), Language::French);
        assert_eq!(fallback_metadata(text).language, Language::French);
    }

    #[test]
    fn test_english_text() {
        assert_eq!(fallback_metadata("the quick brown fox").language, Language::English);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly three French words is not enough
        assert_eq!(detect_language("le chat et la souris", 3), Language::English);
        assert_eq!(detect_language("le chat et la souris de", 3), Language::French);
    }

    #[test]
    fn test_french_words_must_be_whole_tokens() {
        // "cela", "leader", "detail" contain French words only as substrings
        assert_eq!(
            detect_language("cela leader detail unless desk", 3),
            Language::English
        );
    }

    #[test]
    fn test_french_with_apostrophes_and_case() {
        let text = "Le succès d'une équipe est le fruit de la confiance.";
        assert_eq!(detect_language(text, 3), Language::French);
    }

    #[test]
    fn test_tag_cap_takes_first_two_in_table_order() {
        let text = "Leadership lessons from my startup career in software";
        let tags = fallback_metadata(text).tags;
        assert_eq!(tags, vec![Tag::Career, Tag::Business]);
    }

    #[test]
    fn test_tags_skip_unmatched_categories() {
        let tags = match_tags("Growing my professional network through brand work", 2);
        assert_eq!(tags, vec![Tag::Career, Tag::Marketing]);
    }

    #[test]
    fn test_multiword_trigger() {
        assert_eq!(match_tags("Social Media strategy", 2), vec![Tag::Marketing]);
    }

    #[test]
    fn test_no_tags() {
        assert!(match_tags("the quick brown fox", 2).is_empty());
    }

    #[test]
    fn test_zero_max_tags() {
        assert!(match_tags("career business tech", 0).is_empty());
    }

    #[test]
    fn test_degenerate() {
        let generator = FallbackGenerator::default();
        let metadata = generator.degenerate("le la les de\nsoftware team");
        assert_eq!(metadata.line_count, 2);
        assert_eq!(metadata.language, Language::English);
        assert!(metadata.tags.is_empty());
    }

    #[test]
    fn test_generator_caps_configured_tags() {
        let generator = FallbackGenerator::new(3, 10);
        let metadata = generator.generate("career business technology leadership");
        assert_eq!(metadata.tags.len(), 2);
    }

    proptest! {
        #[test]
        fn test_fallback_is_always_schema_valid(text in ".*") {
            let metadata = fallback_metadata(&text);
            prop_assert!(metadata.is_valid());
            prop_assert!(metadata.line_count >= 1);
            prop_assert!(metadata.tags.iter().all(|tag| Tag::ALL.contains(tag)));
        }

        #[test]
        fn test_fallback_is_deterministic(text in ".*") {
            prop_assert_eq!(fallback_metadata(&text), fallback_metadata(&text));
        }
    }
}
