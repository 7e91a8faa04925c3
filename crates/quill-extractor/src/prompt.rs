//! LLM prompt for metadata extraction

/// Marker appended to posts cut down to the prompt budget
pub const TRUNCATION_MARKER: &str = "...";

/// Builds the extraction prompt for a single post
pub struct PromptBuilder {
    text: String,
    max_chars: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>, max_chars: usize) -> Self {
        Self {
            text: text.into(),
            max_chars,
        }
    }

    /// The post text as it will appear in the prompt
    pub fn post_text(&self) -> String {
        truncate_chars(&self.text, self.max_chars)
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Post:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.post_text());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Keep at most `max_chars` characters, appending [`TRUNCATION_MARKER`] if
/// anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract the following information from this LinkedIn post:
- line_count: number of lines in the post (a non-negative integer)
- language: either "English" or "French"
- tags: an array of at most two relevant topic tags, chosen from
  "career", "business", "tech", "leadership", "marketing", "networking"
  (an empty array if none apply)"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (a single JSON object, nothing else):
{"line_count": 3, "language": "English", "tags": ["tech"]}

CRITICAL: Return ONLY a valid JSON object. No explanations, no markdown, no additional text.

JSON:"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("Excited to join Acme as CTO!", 1000).build();
        assert!(prompt.contains("Excited to join Acme as CTO!"));
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let prompt = PromptBuilder::new("Test", 1000).build();
        assert!(prompt.contains("line_count"));
        assert!(prompt.contains("language"));
        assert!(prompt.contains("tags"));
        assert!(prompt.contains("Return ONLY a valid JSON object"));
        assert!(prompt.ends_with("JSON:"));
    }

    #[test]
    fn test_short_text_not_truncated() {
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_long_text_truncated_with_marker() {
        assert_eq!(truncate_chars("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(1200);
        let truncated = truncate_chars(&text, 1000);
        assert_eq!(truncated.chars().count(), 1000 + TRUNCATION_MARKER.len());
        assert!(truncated.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_prompt_limits_post_length() {
        let text = "a".repeat(1500);
        let builder = PromptBuilder::new(text, 1000);
        assert_eq!(builder.post_text().len(), 1003);
        assert!(!builder.build().contains(&"a".repeat(1001)));
    }
}
