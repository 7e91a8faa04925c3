//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::commands::build_provider;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use quill_domain::CompletionProvider;
use quill_extractor::{BatchOutcome, BatchProcessor, ExtractorConfig};
use quill_llm::OfflineProvider;
use std::path::Path;
use tracing::info;

/// Execute the process command.
pub fn execute_process(
    args: ProcessArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<BatchOutcome> {
    let input = args.input.unwrap_or_else(|| config.io.input.clone());
    let output = args.output.unwrap_or_else(|| config.io.output.clone());

    let extractor_config = if args.no_backoff {
        ExtractorConfig {
            initial_backoff_secs: 0,
            ..config.extractor.clone()
        }
    } else {
        config.extractor.clone()
    };

    let outcome = if args.offline {
        info!("Offline mode: using heuristic metadata only");
        run_batch(OfflineProvider, extractor_config, &input, &output)?
    } else {
        let provider = build_provider(&config.provider, api_key)?;
        info!("Using model {} at {}", config.provider.model, config.provider.endpoint);
        run_batch(provider, extractor_config, &input, &output)?
    };

    println!("{}", formatter.summary(&outcome.metrics));
    if args.preview > 0 {
        println!();
        println!("{}", formatter.info("Sample processed posts:"));
        println!("{}", formatter.preview(&outcome.posts, args.preview));
    }

    Ok(outcome)
}

fn run_batch<P: CompletionProvider>(
    provider: P,
    config: ExtractorConfig,
    input: &Path,
    output: &Path,
) -> Result<BatchOutcome> {
    Ok(BatchProcessor::new(provider, config).process_file(input, output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use quill_extractor::load_posts;
    use std::fs;
    use tempfile::TempDir;

    fn offline_args(dir: &TempDir) -> ProcessArgs {
        ProcessArgs {
            input: Some(dir.path().join("raw.json")),
            output: Some(dir.path().join("out").join("processed.json")),
            offline: true,
            no_backoff: false,
            preview: 3,
        }
    }

    #[test]
    fn test_offline_run() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("raw.json"),
            r#"[{"text": "New job at a tech startup!", "likes": 4}, {"text": "Bonjour\nle monde"}]"#,
        )
        .unwrap();

        let outcome = execute_process(
            offline_args(&dir),
            &Config::default(),
            None,
            &Formatter::new(false),
        )
        .unwrap();

        assert_eq!(outcome.metrics.fallback, 2);
        assert_eq!(outcome.metrics.attempts, 2);

        let written = load_posts(dir.path().join("out").join("processed.json")).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0]["likes"], 4);
        assert_eq!(written[0]["tags"], serde_json::json!(["career", "business"]));
        assert_eq!(written[1]["line_count"], 2);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = execute_process(
            offline_args(&dir),
            &Config::default(),
            None,
            &Formatter::new(false),
        );
        assert!(matches!(result, Err(CliError::Extractor(_))));
    }

    #[test]
    fn test_online_run_requires_api_key() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("raw.json"), "[]").unwrap();
        let args = ProcessArgs {
            offline: false,
            ..offline_args(&dir)
        };

        let result = execute_process(args, &Config::default(), None, &Formatter::new(false));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
