//! Fixed scorer implementation - returns canned polarities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use triage_core::{ScorerError, SentimentScorer};

/// A scorer that returns a preset polarity.
///
/// Keyword rules are checked in insertion order against the lowercased input;
/// the first rule whose keyword appears wins, otherwise the default applies.
/// Every call is counted and the last input recorded so tests can assert on
/// what reached the backend.
#[derive(Debug, Default)]
pub struct FixedScorer {
    default: f64,
    rules: Vec<(String, f64)>,
    calls: AtomicUsize,
    last_input: Mutex<Option<String>>,
}

impl FixedScorer {
    /// Create a scorer returning `value` for every input.
    pub fn new(value: f64) -> Self {
        Self {
            default: value,
            ..Self::default()
        }
    }

    /// Return `value` for inputs containing `keyword`.
    pub fn with_rule(mut self, keyword: impl Into<String>, value: f64) -> Self {
        self.rules.push((keyword.into().to_lowercase(), value));
        self
    }

    /// Number of times the backend was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent input, if any.
    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SentimentScorer for FixedScorer {
    async fn polarity(&self, text: &str) -> Result<f64, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_input.lock() {
            *last = Some(text.to_string());
        }

        let lowered = text.to_lowercase();
        let value = self
            .rules
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
            .map(|(_, value)| *value)
            .unwrap_or(self.default);

        Ok(value)
    }

    fn name(&self) -> &str {
        "FixedScorer"
    }
}
