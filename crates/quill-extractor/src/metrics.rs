//! Counters for a batch run

use crate::types::{Provenance, RetryOutcome};
use std::time::Duration;

/// Metrics collected while processing a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMetrics {
    /// Posts written to the output
    pub posts_processed: usize,

    /// Posts whose metadata came from the model
    pub model_derived: usize,

    /// Posts whose metadata came from the heuristic fallback
    pub fallback: usize,

    /// Posts that failed outright and got degenerate metadata
    pub item_failures: usize,

    /// Completion attempts across all posts
    pub attempts: u64,

    /// Time spent backing off across all posts
    pub backoff: Duration,
}

impl BatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of the retry controller for one post
    pub fn record_outcome(&mut self, outcome: &RetryOutcome) {
        self.record_provenance(outcome.provenance);
        self.attempts += u64::from(outcome.attempts);
        self.backoff += outcome.backoff;
    }

    /// Record a post that failed before or outside the retry controller
    pub fn record_item_failure(&mut self) {
        self.record_provenance(Provenance::ItemFallback);
    }

    fn record_provenance(&mut self, provenance: Provenance) {
        self.posts_processed += 1;
        match provenance {
            Provenance::Model => self.model_derived += 1,
            Provenance::Fallback => self.fallback += 1,
            Provenance::ItemFallback => self.item_failures += 1,
        }
    }

    /// Share of posts that got model metadata, 0.0 for an empty batch
    pub fn model_ratio(&self) -> f64 {
        if self.posts_processed == 0 {
            return 0.0;
        }
        self.model_derived as f64 / self.posts_processed as f64
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Posts processed: {}", self.posts_processed),
            format!("  From model: {}", self.model_derived),
            format!("  From fallback: {}", self.fallback),
            format!("  Item failures: {}", self.item_failures),
            format!("Completion attempts: {}", self.attempts),
            format!("Total backoff: {}s", self.backoff.as_secs()),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_domain::Metadata;

    fn outcome(provenance: Provenance, attempts: u32, backoff_secs: u64) -> RetryOutcome {
        RetryOutcome {
            metadata: Metadata::default(),
            provenance,
            attempts,
            backoff: Duration::from_secs(backoff_secs),
            last_error: None,
        }
    }

    #[test]
    fn test_metrics_creation() {
        let metrics = BatchMetrics::new();
        assert_eq!(metrics.posts_processed, 0);
        assert_eq!(metrics.attempts, 0);
        assert_eq!(metrics.model_ratio(), 0.0);
    }

    #[test]
    fn test_record_outcomes() {
        let mut metrics = BatchMetrics::new();
        metrics.record_outcome(&outcome(Provenance::Model, 1, 0));
        metrics.record_outcome(&outcome(Provenance::Model, 2, 5));
        metrics.record_outcome(&outcome(Provenance::Fallback, 3, 15));
        metrics.record_item_failure();

        assert_eq!(metrics.posts_processed, 4);
        assert_eq!(metrics.model_derived, 2);
        assert_eq!(metrics.fallback, 1);
        assert_eq!(metrics.item_failures, 1);
        assert_eq!(metrics.attempts, 6);
        assert_eq!(metrics.backoff, Duration::from_secs(20));
        assert_eq!(metrics.model_ratio(), 0.5);
    }

    #[test]
    fn test_summary() {
        let mut metrics = BatchMetrics::new();
        metrics.record_outcome(&outcome(Provenance::Fallback, 3, 15));

        let summary = metrics.summary();
        assert!(summary.contains("Posts processed: 1"));
        assert!(summary.contains("From fallback: 1"));
        assert!(summary.contains("Completion attempts: 3"));
        assert!(summary.contains("Total backoff: 15s"));
    }
}
