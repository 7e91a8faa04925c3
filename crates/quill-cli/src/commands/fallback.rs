//! Fallback command implementation.

use crate::cli::FallbackArgs;
use crate::error::Result;
use quill_extractor::{ExtractorConfig, FallbackGenerator, MetadataRecord};

/// Execute the fallback command.
pub fn execute_fallback(args: FallbackArgs, config: &ExtractorConfig) -> Result<()> {
    println!("{}", render_fallback(&args.text, config)?);
    Ok(())
}

/// Heuristic metadata for `text` as pretty JSON.
pub fn render_fallback(text: &str, config: &ExtractorConfig) -> Result<String> {
    let metadata = FallbackGenerator::from_config(config).generate(text);
    Ok(serde_json::to_string_pretty(&MetadataRecord::from(&metadata))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_render_fallback() {
        let output = render_fallback(
            "Le leadership est une question de confiance et de respect.\nMerci à mon équipe",
            &ExtractorConfig::default(),
        )
        .unwrap();

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["line_count"], 2);
        assert_eq!(value["language"], "French");
        assert_eq!(value["tags"], serde_json::json!(["leadership"]));
    }
}
