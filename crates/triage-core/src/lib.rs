//! Core traits, domain types and catalogs for the mood triage engine.
//!
//! This crate provides the shared vocabulary for every triage component:
//!
//! - [`SentimentScorer`] - The capability trait all sentiment backends implement
//! - [`GuardedScorer`] - Wraps a scorer and enforces the scoring contract
//!   (blank input, truncation, degraded fallback)
//! - [`Catalog`] - The immutable, indexed set of canned responses,
//!   recommendation items and risk phrase lists
//! - Domain records: [`MoodEntry`], [`ChatTurn`], [`TriageContext`], [`RiskTier`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use triage_core::{async_trait, GuardedScorer, ScorerError, SentimentScorer};
//!
//! struct Neutral;
//!
//! #[async_trait]
//! impl SentimentScorer for Neutral {
//!     async fn polarity(&self, _text: &str) -> Result<f64, ScorerError> {
//!         Ok(0.0)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "neutral"
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scorer = GuardedScorer::new(Arc::new(Neutral));
//! let score = scorer.score("").await;
//! assert_eq!(score.value, 0.0);
//! assert!(!score.degraded);
//! # }
//! ```

mod catalog;
mod error;
mod fingerprint;
mod scorer;
mod types;

pub use catalog::{
    Catalog, CatalogSource, PhraseLists, RecommendationItem, RecommendationTiers,
    ResponseCandidate,
};
pub use error::{CatalogError, ScorerError};
pub use fingerprint::fingerprint;
pub use scorer::{truncate_chars, GuardedScorer, SentimentScorer, DEFAULT_MAX_CHARS, DEFAULT_SCORE_TIMEOUT};
pub use types::{
    Assessment, ChatTurn, MoodEntry, NewChatTurn, NewMoodEntry, RiskTier, SentimentScore, Sender,
    TriageContext, TurnTriage, MAX_MOOD_VALUE, MIN_MOOD_VALUE,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
