//! Metadata module - the derived fields attached to every post

use crate::tag::Tag;
use std::fmt;

/// Maximum number of topical tags a post may carry
pub const MAX_TAGS: usize = 2;

/// Detected language of a post
///
/// Classification is binary: anything that is not recognised as French
/// is reported as English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// English (also the default for unrecognised text)
    #[default]
    English,

    /// French
    French,
}

impl Language {
    /// Get the language name as it appears in the output artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
        }
    }

    /// Parse a language name, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "english" => Some(Language::English),
            "french" => Some(Language::French),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid language: {}", s))
    }
}

/// Metadata derived for a single post
///
/// Both the model path and the local fallback produce exactly this record,
/// so consumers never need to know which one was used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Number of newline-delimited lines in the post
    pub line_count: usize,

    /// Detected language
    pub language: Language,

    /// Topical tags, unique, at most [`MAX_TAGS`]
    pub tags: Vec<Tag>,
}

impl Metadata {
    /// Create metadata, normalizing the tag list
    ///
    /// Duplicate tags are removed (first occurrence wins) and the list is
    /// capped at [`MAX_TAGS`].
    pub fn new(line_count: usize, language: Language, tags: Vec<Tag>) -> Self {
        let mut unique = Vec::with_capacity(MAX_TAGS);
        for tag in tags {
            if unique.len() == MAX_TAGS {
                break;
            }
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self {
            line_count,
            language,
            tags: unique,
        }
    }

    /// Tag names in order, as written to the output artifact
    pub fn tag_names(&self) -> Vec<&'static str> {
        self.tags.iter().map(Tag::as_str).collect()
    }

    /// Check the schema invariants
    pub fn is_valid(&self) -> bool {
        if self.tags.len() > MAX_TAGS {
            return false;
        }
        self.tags
            .iter()
            .enumerate()
            .all(|(i, tag)| !self.tags[..i].contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("English"), Some(Language::English));
        assert_eq!(Language::parse(" french "), Some(Language::French));
        assert_eq!(Language::parse("FRENCH"), Some(Language::French));
        assert_eq!(Language::parse("Spanish"), None);
    }

    #[test]
    fn test_language_display() {
        assert_eq!(Language::English.to_string(), "English");
        assert_eq!(Language::French.to_string(), "French");
        assert_eq!("french".parse::<Language>().unwrap(), Language::French);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_metadata_new_dedupes_and_caps_tags() {
        let metadata = Metadata::new(
            3,
            Language::English,
            vec![Tag::Tech, Tag::Tech, Tag::Career, Tag::Business],
        );
        assert_eq!(metadata.tags, vec![Tag::Tech, Tag::Career]);
        assert!(metadata.is_valid());
    }

    #[test]
    fn test_metadata_invalid_when_constructed_directly() {
        let metadata = Metadata {
            line_count: 1,
            language: Language::French,
            tags: vec![Tag::Tech, Tag::Tech],
        };
        assert!(!metadata.is_valid());

        let metadata = Metadata {
            line_count: 1,
            language: Language::French,
            tags: vec![Tag::Tech, Tag::Career, Tag::Business],
        };
        assert!(!metadata.is_valid());
    }

    #[test]
    fn test_tag_names() {
        let metadata = Metadata::new(1, Language::English, vec![Tag::Leadership, Tag::Marketing]);
        assert_eq!(metadata.tag_names(), vec!["leadership", "marketing"]);
    }
}
