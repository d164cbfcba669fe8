//! Rule-based risk classification.

use std::sync::Arc;

use tracing::debug;
use triage_core::{Assessment, Catalog, RiskTier, SentimentScore};

/// Compound score at or below which text is HIGH risk.
pub const HIGH_SENTIMENT_THRESHOLD: f64 = -0.6;

/// Compound score at or below which text is MEDIUM risk.
pub const MEDIUM_SENTIMENT_THRESHOLD: f64 = -0.3;

/// Mood rating (of 10) at or below which an entry is MEDIUM risk.
pub const LOW_MOOD_THRESHOLD: u8 = 3;

/// Classifies text into a [`RiskTier`].
///
/// Rules are evaluated strictly in order and the first match wins:
///
/// 1. a HIGH phrase appears in the text
/// 2. a MEDIUM phrase appears in the text
/// 3. sentiment at or below [`HIGH_SENTIMENT_THRESHOLD`]
/// 4. sentiment at or below [`MEDIUM_SENTIMENT_THRESHOLD`]
/// 5. a mood rating at or below [`LOW_MOOD_THRESHOLD`]
///
/// Anything else is LOW. Phrase matching is a case-insensitive substring
/// test; no tokenization or stemming happens.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    catalog: Arc<Catalog>,
}

impl RiskClassifier {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Classify and explain. Total over its inputs.
    pub fn classify(&self, text: &str, sentiment: f64, mood_value: Option<u8>) -> (RiskTier, String) {
        let lowered = text.to_lowercase();
        let phrases = self.catalog.phrases();

        if let Some(phrase) = first_match(&lowered, &phrases.high) {
            return (RiskTier::High, format!("keyword match: '{}'", phrase));
        }
        if let Some(phrase) = first_match(&lowered, &phrases.medium) {
            return (RiskTier::Medium, format!("keyword match: '{}'", phrase));
        }

        if sentiment <= HIGH_SENTIMENT_THRESHOLD {
            return (RiskTier::High, format!("compound {}", sentiment));
        }
        if sentiment <= MEDIUM_SENTIMENT_THRESHOLD {
            return (RiskTier::Medium, format!("compound {}", sentiment));
        }

        if let Some(mood) = mood_value {
            if mood <= LOW_MOOD_THRESHOLD {
                return (RiskTier::Medium, format!("mood_value {}", mood));
            }
        }

        (RiskTier::Low, format!("compound {}", sentiment))
    }

    /// Classify a scored piece of text into a full [`Assessment`].
    pub fn assess(&self, text: &str, sentiment: SentimentScore, mood_value: Option<u8>) -> Assessment {
        let (risk, explanation) = self.classify(text, sentiment.value, mood_value);
        debug!(risk = risk.as_str(), "Risk classified: {}", explanation);
        Assessment {
            sentiment,
            risk,
            explanation,
        }
    }
}

fn first_match<'a>(text: &str, phrases: &'a [String]) -> Option<&'a str> {
    phrases
        .iter()
        .find(|phrase| text.contains(phrase.as_str()))
        .map(String::as_str)
}
