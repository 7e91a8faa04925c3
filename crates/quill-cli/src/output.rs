//! Output formatting for the CLI.

use colored::*;
use quill_extractor::{truncate_chars, BatchMetrics, EnrichedPost};
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of post text shown in the preview
pub const PREVIEW_CHARS: usize = 100;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format run metrics.
    pub fn summary(&self, metrics: &BatchMetrics) -> String {
        let headline = format!("Processing complete! Processed {} posts.", metrics.posts_processed);
        let mut out = self.success(&headline);
        out.push('\n');
        out.push_str(&metrics.summary());

        if metrics.item_failures > 0 {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "{} post(s) could not be processed and got minimal metadata",
                metrics.item_failures
            )));
        }
        out
    }

    /// Format the first `limit` enriched posts as a table.
    pub fn preview(&self, posts: &[EnrichedPost], limit: usize) -> String {
        if posts.is_empty() || limit == 0 {
            return self.colorize("No posts to preview.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Text preview", "Language", "Lines", "Tags"]);

        for (i, post) in posts.iter().take(limit).enumerate() {
            let text = post.get("text").and_then(Value::as_str).unwrap_or_default();
            let preview = truncate_chars(&text.replace('\n', " "), PREVIEW_CHARS);
            let language = post
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or("Unknown");
            let lines = post
                .get("line_count")
                .and_then(Value::as_u64)
                .unwrap_or(0)
                .to_string();
            let tags = post
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();

            builder.push_record([
                (i + 1).to_string(),
                preview,
                language.to_string(),
                lines,
                tags,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enriched(value: Value) -> EnrichedPost {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_preview_table() {
        let formatter = Formatter::new(false);
        let posts = vec![
            enriched(json!({"text": "First\npost", "language": "English", "line_count": 2, "tags": ["tech", "career"]})),
            enriched(json!({"text": "x".repeat(150), "language": "French", "line_count": 1, "tags": []})),
        ];

        let output = formatter.preview(&posts, 3);
        assert!(output.contains("Text preview"));
        assert!(output.contains("First post"));
        assert!(output.contains("tech, career"));
        assert!(output.contains("French"));
        assert!(output.contains(&format!("{}...", "x".repeat(100))));
        assert!(!output.contains(&"x".repeat(101)));
    }

    #[test]
    fn test_preview_limit() {
        let formatter = Formatter::new(false);
        let posts: Vec<EnrichedPost> = (0..5)
            .map(|i| enriched(json!({"text": format!("post-{}", i), "language": "English", "line_count": 1, "tags": []})))
            .collect();

        let output = formatter.preview(&posts, 3);
        assert!(output.contains("post-2"));
        assert!(!output.contains("post-3"));
    }

    #[test]
    fn test_empty_preview() {
        let formatter = Formatter::new(false);
        assert!(formatter.preview(&[], 3).contains("No posts"));
    }

    #[test]
    fn test_summary() {
        let formatter = Formatter::new(false);
        let mut metrics = BatchMetrics::new();
        metrics.record_item_failure();

        let output = formatter.summary(&metrics);
        assert!(output.starts_with("✓ Processing complete! Processed 1 posts."));
        assert!(output.contains("Item failures: 1"));
        assert!(output.contains("⚠"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
