//! Sentiment scorers for the mood triage engine.
//!
//! Two interchangeable backends implement [`SentimentScorer`]:
//!
//! - [`LexiconScorer`] - in-process valence lexicon with negation and
//!   intensifier handling. Deterministic, no I/O.
//! - [`ModelScorer`] - a remote text-classification model reached over HTTP,
//!   with bounded concurrency and a per-request timeout.
//!
//! Either one is wrapped in a [`GuardedScorer`] so callers get the full
//! scoring contract (blank input, truncation, degraded fallback) regardless
//! of which backend is active.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sentiment::{build_scorer, SentimentConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SentimentConfig::from_env()?;
//!     let scorer = build_scorer(&config)?;
//!
//!     let score = scorer.score("Had a great day with friends").await;
//!     println!("{} (degraded: {})", score.value, score.degraded);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod lexicon;
mod model;

use std::sync::Arc;

use tracing::info;

pub use config::{ModelScorerConfig, SentimentBackend, SentimentConfig};
pub use lexicon::LexiconScorer;
pub use model::ModelScorer;

// Re-export triage-core types for convenience
pub use triage_core::{async_trait, GuardedScorer, ScorerError, SentimentScore, SentimentScorer};

/// Build the configured backend and wrap it in a [`GuardedScorer`].
pub fn build_scorer(config: &SentimentConfig) -> Result<GuardedScorer, ScorerError> {
    let backend: Arc<dyn SentimentScorer> = match config.backend {
        SentimentBackend::Lexicon => Arc::new(LexiconScorer::new()),
        SentimentBackend::Model => {
            let model_config = config.model.clone().ok_or_else(|| {
                ScorerError::Configuration(
                    "SENTIMENT_BACKEND=model requires SENTIMENT_MODEL_URL".to_string(),
                )
            })?;
            Arc::new(ModelScorer::new(model_config)?)
        }
    };

    info!(
        "Sentiment backend: {} (max chars: {}, timeout: {:?})",
        backend.name(),
        config.max_chars,
        config.timeout
    );

    Ok(GuardedScorer::new(backend)
        .with_max_chars(config.max_chars)
        .with_timeout(config.timeout))
}
