//! Delayed scorer implementation - wraps another scorer with artificial delay.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use triage_core::{ScorerError, SentimentScorer};

/// A scorer that wraps another scorer and adds artificial delay.
///
/// Useful for testing timeout handling and concurrent request paths.
pub struct DelayedScorer<S: SentimentScorer> {
    inner: S,
    delay: Duration,
}

impl<S: SentimentScorer> DelayedScorer<S> {
    /// Create a new DelayedScorer wrapping the given scorer with the specified delay.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a scorer with a delay in milliseconds.
    pub fn with_millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the wrapped scorer.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SentimentScorer> SentimentScorer for DelayedScorer<S> {
    async fn polarity(&self, text: &str) -> Result<f64, ScorerError> {
        sleep(self.delay).await;
        self.inner.polarity(text).await
    }

    fn name(&self) -> &str {
        "DelayedScorer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedScorer;
    use std::sync::Arc;
    use std::time::Instant;
    use triage_core::GuardedScorer;

    #[tokio::test]
    async fn test_delayed_scorer() {
        let scorer = DelayedScorer::with_millis(FixedScorer::new(0.5), 50);

        let start = Instant::now();
        let value = scorer.polarity("test").await.unwrap();

        assert_eq!(value, 0.5);
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(scorer.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_guarded_timeout_degrades() {
        let slow = DelayedScorer::with_millis(FixedScorer::new(0.9), 500);
        let guarded = GuardedScorer::new(Arc::new(slow)).with_timeout(Duration::from_millis(20));

        let score = guarded.score("hello").await;
        assert!(score.degraded);
    }

    #[tokio::test]
    async fn test_concurrent_calls() {
        let scorer = Arc::new(DelayedScorer::with_millis(FixedScorer::new(0.1), 20));

        let calls = (0..8).map(|i| {
            let scorer = scorer.clone();
            async move { scorer.polarity(&format!("message {i}")).await }
        });
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(|r| matches!(r, Ok(v) if *v == 0.1)));
        assert_eq!(scorer.inner().calls(), 8);
    }
}
