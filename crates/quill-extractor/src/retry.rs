//! Bounded retry with exponential backoff and heuristic fallback
//!
//! ```text
//! attempt 0 ──ok──▶ Succeeded
//!     │ err
//!     ├─ not retryable ──────────────────────────▶ Exhausted
//!     ├─ retryable, attempts left ─ sleep 5s ─▶ attempt 1 ...
//!     └─ retryable, last attempt ────────────────▶ Exhausted
//! Exhausted ──▶ fallback metadata
//! ```

use crate::config::ExtractorConfig;
use crate::extractor::MetadataExtractor;
use crate::fallback::FallbackGenerator;
use crate::types::{Provenance, RetryOutcome};
use quill_domain::{CompletionProvider, Metadata};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

/// Blocks the current thread between attempts
pub trait Sleeper {
    /// Wait for `duration`
    fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by [`std::thread::sleep`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Sleeper that records requested waits instead of blocking
///
/// Clones share the record, so a test can keep one handle and give the other
/// to a controller.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum of all requested waits
    pub fn total(&self) -> Duration {
        self.sleeps().into_iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

/// Wraps a [`MetadataExtractor`] with retries and a guaranteed fallback
pub struct RetryController<P, S = ThreadSleeper>
where
    P: CompletionProvider,
    S: Sleeper,
{
    extractor: MetadataExtractor<P>,
    fallback: FallbackGenerator,
    sleeper: S,
    config: ExtractorConfig,
}

impl<P> RetryController<P, ThreadSleeper>
where
    P: CompletionProvider,
{
    /// Create a controller that really sleeps between attempts
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self::with_sleeper(provider, config, ThreadSleeper)
    }
}

impl<P, S> RetryController<P, S>
where
    P: CompletionProvider,
    S: Sleeper,
{
    /// Create a controller with a custom sleeper
    pub fn with_sleeper(provider: P, config: ExtractorConfig, sleeper: S) -> Self {
        Self {
            extractor: MetadataExtractor::new(provider, &config),
            fallback: FallbackGenerator::from_config(&config),
            sleeper,
            config,
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The fallback generator in use
    pub fn fallback(&self) -> &FallbackGenerator {
        &self.fallback
    }

    /// Extract metadata, never failing
    pub fn extract_with_retry(&self, post_text: &str) -> Metadata {
        self.run(post_text).metadata
    }

    /// Extract metadata with the configured attempt budget, reporting how
    /// the result was obtained
    pub fn run(&self, post_text: &str) -> RetryOutcome {
        self.run_with_attempts(post_text, self.config.max_attempts)
    }

    /// Extract metadata with an explicit attempt budget
    ///
    /// A budget of zero goes straight to the fallback.
    pub fn run_with_attempts(&self, post_text: &str, max_attempts: u32) -> RetryOutcome {
        let mut backoff = Duration::ZERO;
        let mut last_error = None;
        let mut attempts = 0;

        for attempt in 0..max_attempts {
            attempts = attempt + 1;
            match self.extractor.extract(post_text) {
                Ok(metadata) => {
                    return RetryOutcome {
                        metadata,
                        provenance: Provenance::Model,
                        attempts,
                        backoff,
                        last_error,
                    };
                }
                Err(e) => {
                    let retryable = e.is_retryable(&self.config.retryable_patterns);
                    last_error = Some(e.to_string());

                    if !retryable {
                        warn!("Non-retryable error: {}", e);
                        break;
                    }

                    if attempts < max_attempts {
                        let wait = self.config.backoff(attempt);
                        warn!(
                            "Completion failed (attempt {}/{}): {}. Retrying in {}s...",
                            attempts,
                            max_attempts,
                            e,
                            wait.as_secs()
                        );
                        self.sleeper.sleep(wait);
                        backoff += wait;
                    } else {
                        warn!(
                            "Completion failed (attempt {}/{}): {}",
                            attempts, max_attempts, e
                        );
                    }
                }
            }
        }

        info!("All completion attempts failed, using fallback metadata");
        RetryOutcome {
            metadata: self.fallback.generate(post_text),
            provenance: Provenance::Fallback,
            attempts,
            backoff,
            last_error,
        }
    }
}
