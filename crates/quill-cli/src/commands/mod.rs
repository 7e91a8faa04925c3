//! Command implementations.

pub mod fallback;
pub mod probe;
pub mod process;

pub use self::fallback::execute_fallback;
pub use self::probe::execute_probe;
pub use self::process::execute_process;

use crate::config::ProviderConfig;
use crate::error::{CliError, Result};
use quill_llm::GroqProvider;
use std::time::Duration;

/// Build the completion provider from configuration.
///
/// `api_key` (from the command line or `GROQ_API_KEY`) wins over the
/// configured key.
pub fn build_provider(config: &ProviderConfig, api_key: Option<&str>) -> Result<GroqProvider> {
    let api_key = api_key
        .or(config.api_key.as_deref())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            CliError::Config(
                "No API key. Set GROQ_API_KEY, pass --api-key or set provider.api_key".into(),
            )
        })?;

    let provider = GroqProvider::with_timeout(
        &config.endpoint,
        &config.model,
        api_key,
        Duration::from_secs(config.timeout_secs),
    )?;

    Ok(match config.temperature {
        Some(temperature) => provider.with_temperature(temperature),
        None => provider,
    })
}
