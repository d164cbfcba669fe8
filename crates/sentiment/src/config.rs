//! Configuration for sentiment backends.

use std::env;
use std::time::Duration;

use triage_core::{ScorerError, DEFAULT_MAX_CHARS, DEFAULT_SCORE_TIMEOUT};

/// Default number of concurrent inference requests to a model endpoint.
const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Which backend implements sentiment scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentBackend {
    /// In-process valence lexicon.
    #[default]
    Lexicon,
    /// Remote text-classification model.
    Model,
}

impl SentimentBackend {
    /// Parse a backend name from configuration.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lexicon" | "vader" => Some(Self::Lexicon),
            "model" | "bert" | "http" => Some(Self::Model),
            _ => None,
        }
    }
}

/// Settings for [`crate::ModelScorer`].
#[derive(Debug, Clone)]
pub struct ModelScorerConfig {
    /// Inference endpoint accepting `{"inputs": "..."}`.
    pub api_url: String,

    /// Optional bearer token.
    pub api_key: Option<String>,

    /// Maximum in-flight inference requests.
    pub max_concurrency: usize,

    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl ModelScorerConfig {
    /// Create configuration for an endpoint with default limits.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout: DEFAULT_SCORE_TIMEOUT,
        }
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the concurrency bound.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}

/// Top-level scorer configuration.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Active backend.
    pub backend: SentimentBackend,

    /// Longest prefix (in characters) handed to the backend.
    pub max_chars: usize,

    /// Upper bound on one scoring call, after which the score degrades.
    pub timeout: Duration,

    /// Model endpoint settings; required when `backend` is `Model`.
    pub model: Option<ModelScorerConfig>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            backend: SentimentBackend::Lexicon,
            max_chars: DEFAULT_MAX_CHARS,
            timeout: DEFAULT_SCORE_TIMEOUT,
            model: None,
        }
    }
}

impl SentimentConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `SENTIMENT_BACKEND` - `lexicon` or `model` (default: lexicon)
    /// - `SENTIMENT_MAX_CHARS` - Input prefix bound (default: 512)
    /// - `SENTIMENT_TIMEOUT_SECS` - Per-call timeout (default: 10)
    /// - `SENTIMENT_MODEL_URL` - Inference endpoint (required for `model`)
    /// - `SENTIMENT_API_KEY` - Bearer token for the endpoint
    /// - `SENTIMENT_MAX_CONCURRENCY` - In-flight request bound (default: 4)
    pub fn from_env() -> Result<Self, ScorerError> {
        let backend = match env::var("SENTIMENT_BACKEND") {
            Ok(value) => SentimentBackend::from_str(&value).ok_or_else(|| {
                ScorerError::Configuration(format!("unknown SENTIMENT_BACKEND: {}", value))
            })?,
            Err(_) => SentimentBackend::default(),
        };

        let max_chars = env::var("SENTIMENT_MAX_CHARS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_CHARS);

        let timeout = env::var("SENTIMENT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SCORE_TIMEOUT);

        let model = env::var("SENTIMENT_MODEL_URL").ok().map(|url| {
            let mut config = ModelScorerConfig::new(url);
            config.api_key = env::var("SENTIMENT_API_KEY").ok().filter(|k| !k.is_empty());
            config.request_timeout = timeout;
            if let Some(limit) = env::var("SENTIMENT_MAX_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
            {
                config = config.with_max_concurrency(limit);
            }
            config
        });

        if backend == SentimentBackend::Model && model.is_none() {
            return Err(ScorerError::Configuration(
                "SENTIMENT_MODEL_URL not set".to_string(),
            ));
        }

        Ok(Self {
            backend,
            max_chars,
            timeout,
            model,
        })
    }
}
