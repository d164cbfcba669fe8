//! Engine configuration.

use std::env;
use std::fmt;

use thiserror::Error;

use crate::escalation::DEFAULT_ACCEPTANCE_THRESHOLD;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set to something that does not parse.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// A threshold was outside `[0, 1]`.
    #[error("{var} must be within [0, 1], got {value}")]
    OutOfRange { var: &'static str, value: f64 },
}

/// How the retriever scores candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalStrategy {
    /// Fraction of a candidate's trigger phrases found in the text.
    #[default]
    Keyword,
    /// Cosine similarity in a TF-IDF space built over trigger phrases.
    Vector,
}

impl RetrievalStrategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "overlap" => Some(Self::Keyword),
            "vector" | "tfidf" | "tf-idf" => Some(Self::Vector),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for the retriever and the escalation policy.
///
/// `min_score` is the retriever's own cut-off below which it returns the
/// catalog fallback; `acceptance_threshold` is the policy's separate bar for
/// using a retrieved reply at all.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub strategy: RetrievalStrategy,
    pub min_score: f64,
    pub acceptance_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: RetrievalStrategy::Keyword,
            min_score: 0.0,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `TRIAGE_RETRIEVAL_STRATEGY` - `keyword` or `vector` (default: keyword)
    /// - `TRIAGE_RETRIEVER_MIN_SCORE` - Retriever fallback cut-off (default: 0.0)
    /// - `TRIAGE_ACCEPTANCE_THRESHOLD` - Policy acceptance bar (default: 0.15)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let strategy = match env::var("TRIAGE_RETRIEVAL_STRATEGY") {
            Ok(value) => RetrievalStrategy::from_str(&value).ok_or(ConfigError::Invalid {
                var: "TRIAGE_RETRIEVAL_STRATEGY",
                value,
            })?,
            Err(_) => defaults.strategy,
        };

        let min_score = threshold_var("TRIAGE_RETRIEVER_MIN_SCORE", defaults.min_score)?;
        let acceptance_threshold =
            threshold_var("TRIAGE_ACCEPTANCE_THRESHOLD", defaults.acceptance_threshold)?;

        Ok(Self {
            strategy,
            min_score,
            acceptance_threshold,
        })
    }

    pub fn with_strategy(mut self, strategy: RetrievalStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Stable text form of every setting that changes triage output.
    pub fn describe(&self) -> String {
        format!(
            "strategy={};min_score={};acceptance={}",
            self.strategy, self.min_score, self.acceptance_threshold
        )
    }
}

fn threshold_var(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value: raw.clone() })?;
    parse_threshold(var, value)
}

fn parse_threshold(var: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange { var, value });
    }
    Ok(value)
}
