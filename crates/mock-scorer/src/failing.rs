//! Failing scorer implementation - every call errors.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use triage_core::{ScorerError, SentimentScorer};

/// A scorer whose backend is permanently broken.
#[derive(Debug)]
pub struct FailingScorer {
    error: fn() -> ScorerError,
    calls: AtomicUsize,
}

impl Default for FailingScorer {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl FailingScorer {
    /// Fail as if the model were not loaded.
    pub fn unavailable() -> Self {
        Self {
            error: || ScorerError::Unavailable("mock backend offline".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail as if the request timed out.
    pub fn timing_out() -> Self {
        Self {
            error: || ScorerError::Timeout,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentScorer for FailingScorer {
    async fn polarity(&self, _text: &str) -> Result<f64, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.error)())
    }

    fn name(&self) -> &str {
        "FailingScorer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use triage_core::GuardedScorer;

    #[tokio::test]
    async fn test_always_fails() {
        let scorer = FailingScorer::unavailable();
        assert!(matches!(
            scorer.polarity("hi").await,
            Err(ScorerError::Unavailable(_))
        ));
        assert!(matches!(
            FailingScorer::timing_out().polarity("hi").await,
            Err(ScorerError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_guarded_degrades() {
        let backend = Arc::new(FailingScorer::default());
        let guarded = GuardedScorer::new(backend.clone());

        let score = guarded.score("I had a rough day").await;
        assert!(score.degraded);
        assert_eq!(score.value, 0.0);
        assert_eq!(backend.calls(), 1);
    }
}
