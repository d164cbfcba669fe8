//! The sentiment scoring capability and its contract wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ScorerError;
use crate::types::SentimentScore;

/// Default bound on the input prefix handed to a backend, in characters.
pub const DEFAULT_MAX_CHARS: usize = 512;

/// Default upper bound on a single scoring call.
pub const DEFAULT_SCORE_TIMEOUT: Duration = Duration::from_secs(10);

/// A sentiment backend: text in, valence out.
///
/// Implementations range from an in-process lexicon to a remote model.
/// The trait is object-safe and is normally held as `Arc<dyn SentimentScorer>`
/// inside a [`GuardedScorer`], which owns blank handling, truncation and
/// failure degradation so backends only have to do inference.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Score non-blank, already-truncated text. Values outside `[-1, 1]`
    /// are clamped by the caller.
    async fn polarity(&self, text: &str) -> Result<f64, ScorerError>;

    /// Human-readable backend name; part of the pipeline version.
    fn name(&self) -> &str;
}

/// Wraps a backend and enforces the scoring contract.
///
/// - blank text scores `0.0` without calling the backend
/// - input is cut to a bounded prefix instead of failing
/// - backend errors and timeouts become a degraded `0.0`, never an error
#[derive(Clone)]
pub struct GuardedScorer {
    inner: Arc<dyn SentimentScorer>,
    max_chars: usize,
    timeout: Duration,
}

impl std::fmt::Debug for GuardedScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedScorer")
            .field("backend", &self.inner.name())
            .field("max_chars", &self.max_chars)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GuardedScorer {
    /// Wrap a backend with the default prefix bound and timeout.
    pub fn new(inner: Arc<dyn SentimentScorer>) -> Self {
        Self {
            inner,
            max_chars: DEFAULT_MAX_CHARS,
            timeout: DEFAULT_SCORE_TIMEOUT,
        }
    }

    /// Set the maximum number of characters handed to the backend.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars.max(1);
        self
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the wrapped backend.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Score text. Never fails.
    pub async fn score(&self, text: &str) -> SentimentScore {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SentimentScore::neutral();
        }

        let input = truncate_chars(trimmed, self.max_chars);

        match tokio::time::timeout(self.timeout, self.inner.polarity(input)).await {
            Ok(Ok(value)) if value.is_finite() => {
                let score = SentimentScore::new(value);
                debug!(backend = self.inner.name(), score = score.value, "Scored text");
                score
            }
            Ok(Ok(value)) => {
                warn!(
                    backend = self.inner.name(),
                    "Scorer returned non-finite value {}, degrading to neutral", value
                );
                SentimentScore::degraded()
            }
            Ok(Err(e)) => {
                warn!(backend = self.inner.name(), "Scorer failed, degrading to neutral: {}", e);
                SentimentScore::degraded()
            }
            Err(_) => {
                warn!(
                    backend = self.inner.name(),
                    "Scorer timed out after {:?}, degrading to neutral", self.timeout
                );
                SentimentScore::degraded()
            }
        }
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recording {
        calls: AtomicUsize,
        last_input: Mutex<String>,
        result: f64,
    }

    impl Recording {
        fn new(result: f64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(String::new()),
                result,
            }
        }
    }

    #[async_trait]
    impl SentimentScorer for Recording {
        async fn polarity(&self, text: &str) -> Result<f64, ScorerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = text.to_string();
            Ok(self.result)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct Broken;

    #[async_trait]
    impl SentimentScorer for Broken {
        async fn polarity(&self, _text: &str) -> Result<f64, ScorerError> {
            Err(ScorerError::Unavailable("model not loaded".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    struct Slow;

    #[async_trait]
    impl SentimentScorer for Slow {
        async fn polarity(&self, _text: &str) -> Result<f64, ScorerError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(0.9)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_blank_text_skips_backend() {
        let backend = Arc::new(Recording::new(0.8));
        let scorer = GuardedScorer::new(backend.clone());

        let score = scorer.score("   \n\t").await;
        assert_eq!(score, SentimentScore::neutral());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_long_text_truncated() {
        let backend = Arc::new(Recording::new(0.2));
        let scorer = GuardedScorer::new(backend.clone()).with_max_chars(10);

        let score = scorer.score(&"é".repeat(50)).await;
        assert_eq!(score.value, 0.2);
        assert_eq!(backend.last_input.lock().unwrap().chars().count(), 10);
    }

    #[tokio::test]
    async fn test_out_of_range_clamped() {
        let scorer = GuardedScorer::new(Arc::new(Recording::new(4.0)));
        let score = scorer.score("wonderful").await;
        assert_eq!(score.value, 1.0);
        assert!(!score.degraded);
    }

    #[tokio::test]
    async fn test_failure_degrades() {
        let scorer = GuardedScorer::new(Arc::new(Broken));
        let score = scorer.score("I feel fine").await;
        assert_eq!(score.value, 0.0);
        assert!(score.degraded);
    }

    #[tokio::test]
    async fn test_non_finite_degrades() {
        let scorer = GuardedScorer::new(Arc::new(Recording::new(f64::NAN)));
        let score = scorer.score("anything").await;
        assert!(score.degraded);
        assert_eq!(score.value, 0.0);
    }

    #[tokio::test]
    async fn test_timeout_degrades() {
        let scorer = GuardedScorer::new(Arc::new(Slow)).with_timeout(Duration::from_millis(20));
        let score = scorer.score("hello").await;
        assert!(score.degraded);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("día malo", 3), "día");
        assert_eq!(truncate_chars("", 3), "");
    }
}
