//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Character encoding policy for the output artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// Non-ASCII characters written as-is
    #[default]
    Utf8,
    /// Every non-ASCII character escaped as `\uXXXX`
    Ascii,
}

/// Configuration for extraction, retry and fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Posts longer than this (in characters) are truncated before prompting
    pub max_post_chars: usize,

    /// Total completion attempts per post, including the first
    pub max_attempts: u32,

    /// Wait before the second attempt (seconds)
    pub initial_backoff_secs: u64,

    /// Factor applied to the wait after each further failure
    pub backoff_multiplier: u32,

    /// Case-insensitive message fragments that mark an error as transient
    pub retryable_patterns: Vec<String>,

    /// A post is French when it has more than this many French function words
    pub french_word_threshold: usize,

    /// Maximum tags the fallback generator assigns (0-2)
    pub max_tags: usize,

    /// Encoding tried first when writing the output artifact
    pub output_encoding: OutputEncoding,
}

impl ExtractorConfig {
    /// Wait before attempt `attempt + 1`, given that attempt `attempt`
    /// (zero-based) just failed: `initial * multiplier^attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.backoff_multiplier).saturating_pow(attempt);
        Duration::from_secs(self.initial_backoff_secs.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_post_chars == 0 {
            return Err("max_post_chars must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.backoff_multiplier == 0 {
            return Err("backoff_multiplier must be greater than 0".to_string());
        }
        if self.max_tags > quill_domain::MAX_TAGS {
            return Err(format!(
                "max_tags cannot exceed {}",
                quill_domain::MAX_TAGS
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// 1000-char prompts, 3 attempts with 5s/10s/20s backoff
    fn default() -> Self {
        Self {
            max_post_chars: 1000,
            max_attempts: 3,
            initial_backoff_secs: 5,
            backoff_multiplier: 2,
            retryable_patterns: default_retryable_patterns(),
            french_word_threshold: 3,
            max_tags: 2,
            output_encoding: OutputEncoding::Utf8,
        }
    }
}

fn default_retryable_patterns() -> Vec<String> {
    [
        "503",
        "service unavailable",
        "invalid json output",
        "expecting value",
        "context too big",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ExtractorConfig {
    /// Same as default, but retries happen immediately
    pub fn no_backoff() -> Self {
        Self {
            initial_backoff_secs: 0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_post_chars, 1000);
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_no_backoff_config_is_valid() {
        let config = ExtractorConfig::no_backoff();
        assert!(config.validate().is_ok());
        assert_eq!(config.backoff(0), Duration::ZERO);
        assert_eq!(config.backoff(2), Duration::ZERO);
    }

    #[test]
    fn test_backoff_schedule() {
        let config = ExtractorConfig::default();
        assert_eq!(config.backoff(0), Duration::from_secs(5));
        assert_eq!(config.backoff(1), Duration::from_secs(10));
        assert_eq!(config.backoff(2), Duration::from_secs(20));
    }

    #[test]
    fn test_backoff_saturates() {
        let config = ExtractorConfig::default();
        assert_eq!(config.backoff(200), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ExtractorConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_post_chars = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.backoff_multiplier = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_tags = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_post_chars, parsed.max_post_chars);
        assert_eq!(config.retryable_patterns, parsed.retryable_patterns);
        assert_eq!(config.output_encoding, parsed.output_encoding);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("max_attempts = 5\noutput_encoding = \"ascii\"\n").unwrap();
        assert_eq!(parsed.max_attempts, 5);
        assert_eq!(parsed.output_encoding, OutputEncoding::Ascii);
        assert_eq!(parsed.initial_backoff_secs, 5);
        assert_eq!(parsed.retryable_patterns.len(), 5);
    }
}
